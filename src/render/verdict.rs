use std::fmt;

use serde::Serialize;

/// Background colour of a suitability box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Colour {
    Red,
    Orange,
    Green,
}

impl Colour {
    pub fn as_str(&self) -> &'static str {
        match self {
            Colour::Red => "red",
            Colour::Orange => "orange",
            Colour::Green => "green",
        }
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const UNLIKELY: &str = "Unlikely to be suitable";
pub const LIKELY: &str = "Likely to be suitable";
pub const UNSURE: &str = "Hard to tell";

/// Map a suitability score onto a colour and a verdict sentence.
///
/// `p = score / max_score`: below 0.33 is red, 0.66 and above is green,
/// anything between is orange with a lean unless `p` is exactly one half.
/// A ratio that is not a finite number (non-positive or NaN maximum) is red.
pub fn classify(score: f64, max_score: f64) -> (Colour, String) {
    let p = score / max_score;

    if !p.is_finite() || max_score <= 0.0 {
        return (Colour::Red, UNLIKELY.to_string());
    }

    if p < 0.33 {
        (Colour::Red, UNLIKELY.to_string())
    } else if p >= 0.66 {
        (Colour::Green, LIKELY.to_string())
    } else if p < 0.5 {
        (Colour::Orange, format!("{}, leaning towards unsuitable", UNSURE))
    } else if p > 0.5 {
        (Colour::Orange, format!("{}, leaning towards suitable", UNSURE))
    } else {
        (Colour::Orange, UNSURE.to_string())
    }
}

/// Round to one decimal, the precision scores are displayed (and judged) at.
pub fn round_to_tenth(score: f64) -> f64 {
    (score * 10.0).round() / 10.0
}
