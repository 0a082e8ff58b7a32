use serde::Serialize;

use crate::config::DEFAULT_STATIONS;
use crate::error::BookingError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Station {
    pub name: String,
    pub sequence_index: usize,
}

/// Ordered, immutable list of stops. Names are unique ignoring case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    stations: Vec<Station>,
}

impl Route {
    pub fn new<I, S>(names: I) -> Result<Self, BookingError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut stations: Vec<Station> = Vec::new();
        for name in names {
            let name = name.into().trim().to_string();
            if name.is_empty() {
                return Err(BookingError::invalid("station names must not be empty"));
            }
            if stations.iter().any(|s| s.name.eq_ignore_ascii_case(&name)) {
                return Err(BookingError::invalid(format!("station '{}' appears twice on the route", name)));
            }
            let sequence_index = stations.len();
            stations.push(Station { name, sequence_index });
        }

        if stations.len() < 2 {
            return Err(BookingError::invalid("a route needs at least two stations"));
        }

        Ok(Self { stations })
    }

    /// Ahmedabad → Mumbai with the intermediate stops.
    pub fn ahmedabad_mumbai() -> Self {
        Self {
            stations: DEFAULT_STATIONS
                .iter()
                .enumerate()
                .map(|(sequence_index, name)| Station {
                    name: name.to_string(),
                    sequence_index,
                })
                .collect(),
        }
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub fn origin(&self) -> &Station {
        &self.stations[0]
    }

    pub fn terminus(&self) -> &Station {
        &self.stations[self.stations.len() - 1]
    }

    pub fn find(&self, name: &str) -> Option<&Station> {
        let name = name.trim();
        self.stations.iter().find(|s| s.name.eq_ignore_ascii_case(name))
    }

    /// Resolves both stops and checks that pickup comes strictly before drop.
    pub fn leg(&self, pickup: &str, drop: &str) -> Result<(&Station, &Station), BookingError> {
        let from = self
            .find(pickup)
            .ok_or_else(|| BookingError::invalid(format!("unknown pickup station '{}'", pickup.trim())))?;
        let to = self
            .find(drop)
            .ok_or_else(|| BookingError::invalid(format!("unknown drop station '{}'", drop.trim())))?;

        if from.sequence_index >= to.sequence_index {
            return Err(BookingError::invalid(format!(
                "drop station '{}' must come after pickup station '{}'",
                to.name, from.name
            )));
        }

        Ok((from, to))
    }
}

impl Default for Route {
    fn default() -> Self {
        Self::ahmedabad_mumbai()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_ignores_case_and_whitespace() {
        let route = Route::ahmedabad_mumbai();
        let surat = route.find("  surat ").unwrap();
        assert_eq!(surat.name, "Surat");
        assert_eq!(surat.sequence_index, 3);
        assert!(route.find("Pune").is_none());
    }

    #[test]
    fn leg_requires_forward_travel() {
        let route = Route::ahmedabad_mumbai();
        let (from, to) = route.leg("Ahmedabad", "Mumbai").unwrap();
        assert_eq!((from.sequence_index, to.sequence_index), (0, 6));

        assert!(matches!(route.leg("Mumbai", "Ahmedabad"), Err(BookingError::InvalidInput(_))));
        assert!(matches!(route.leg("Surat", "Surat"), Err(BookingError::InvalidInput(_))));
        assert!(matches!(route.leg("Ahmedabad", "Goa"), Err(BookingError::InvalidInput(_))));
    }

    #[test]
    fn custom_routes_reject_duplicates_and_short_lists() {
        assert!(Route::new(["Ahmedabad", "ahmedabad"]).is_err());
        assert!(Route::new(["Ahmedabad"]).is_err());
        assert!(Route::new(["Ahmedabad", " "]).is_err());

        let route = Route::new(["Ahmedabad", "Surat", "Mumbai"]).unwrap();
        assert_eq!(route.origin().name, "Ahmedabad");
        assert_eq!(route.terminus().name, "Mumbai");
    }
}
