use core::fmt;
use core::str::FromStr;

/// Policy for coordinates that fall outside the image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BorderMode<T> {
    /// Repeat the nearest edge pixel.
    Clamp,
    /// Every outside pixel reads as the given value.
    Constant(T),
    /// Mirror around the edge pixel without repeating it (`dcb|abcd|cba`).
    Reflect101,
}

impl<T> Default for BorderMode<T> {
    fn default() -> Self {
        Self::Clamp
    }
}

impl<T> BorderMode<T> {
    /// Maps a possibly out-of-range index into `[0, len)`.
    ///
    /// Returns `None` for [`BorderMode::Constant`] when `i` is outside, and
    /// for every mode when `len == 0`.
    pub fn map(&self, i: isize, len: usize) -> Option<usize> {
        map_index(i, len, self)
    }
}

pub fn map_index<T>(i: isize, len: usize, mode: &BorderMode<T>) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let inside = i >= 0 && (i as usize) < len;

    match mode {
        BorderMode::Constant(_) => inside.then_some(i as usize),
        BorderMode::Clamp => Some(i.clamp(0, len as isize - 1) as usize),
        BorderMode::Reflect101 => {
            if len == 1 {
                return Some(0);
            }
            let period = (2 * len - 2) as isize;
            let r = i.rem_euclid(period) as usize;
            Some(if r < len { r } else { period as usize - r })
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseBorderModeError(String);

impl fmt::Display for ParseBorderModeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown border mode '{}' (expected clamp, reflect, zero or constant:<value>)",
            self.0
        )
    }
}

impl std::error::Error for ParseBorderModeError {}

impl FromStr for BorderMode<f32> {
    type Err = ParseBorderModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        match lower.as_str() {
            "clamp" | "edge" => Ok(Self::Clamp),
            "reflect" | "reflect101" => Ok(Self::Reflect101),
            "zero" => Ok(Self::Constant(0.0)),
            other => other
                .strip_prefix("constant:")
                .and_then(|v| v.parse::<f32>().ok())
                .map(Self::Constant)
                .ok_or_else(|| ParseBorderModeError(s.to_owned())),
        }
    }
}
