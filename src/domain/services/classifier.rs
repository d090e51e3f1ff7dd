use crate::domain::model::{ExtractedIsotope, Serviceability};

pub fn classify(isotopes: &[ExtractedIsotope]) -> Serviceability {
    if isotopes.is_empty() {
        return Serviceability::Unknown;
    }

    let serviceable = isotopes.iter().filter(|i| i.can_serve).count();
    if serviceable == isotopes.len() {
        Serviceability::CanServe
    } else if serviceable == 0 {
        Serviceability::CannotServe
    } else {
        Serviceability::Partial
    }
}

impl Serviceability {
    /// Sites the network can deliver at least one isotope for.
    pub fn is_serviceable(&self) -> bool {
        matches!(self, Serviceability::CanServe | Serviceability::Partial)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iso(symbol: &str, can_serve: bool) -> ExtractedIsotope {
        ExtractedIsotope {
            symbol: symbol.to_string(),
            half_life_hours: if can_serve { 65.9 } else { 1.13 },
            half_life_display: String::new(),
            can_serve,
        }
    }

    #[test]
    fn test_classify_verdicts() {
        assert_eq!(classify(&[]), Serviceability::Unknown);
        assert_eq!(classify(&[iso("Mo-99", true)]), Serviceability::CanServe);
        assert_eq!(classify(&[iso("F-18", false)]), Serviceability::CannotServe);
        assert_eq!(
            classify(&[iso("Mo-99", true), iso("F-18", false)]),
            Serviceability::Partial
        );
    }

    #[test]
    fn test_classify_ignores_order() {
        let forward = [iso("F-18", false), iso("Mo-99", true), iso("Ga-68", false)];
        let mut reversed = forward.clone();
        reversed.reverse();
        assert_eq!(classify(&forward), classify(&reversed));
    }

    #[test]
    fn test_is_serviceable() {
        assert!(Serviceability::CanServe.is_serviceable());
        assert!(Serviceability::Partial.is_serviceable());
        assert!(!Serviceability::CannotServe.is_serviceable());
        assert!(!Serviceability::Unknown.is_serviceable());
    }
}
