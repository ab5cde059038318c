//! Monthly consumption estimate for users who do not know their figure.

use crate::domain::{Appliance, DwellingType};

/// Used when the dwelling type is missing or unknown (kWh/month)
pub const UNKNOWN_DWELLING_KWH: f64 = 350.0;

/// Base monthly consumption of a dwelling without notable appliances (kWh)
pub fn base_consumption(dwelling_type: Option<DwellingType>) -> f64 {
    match dwelling_type {
        Some(DwellingType::SmallHouse) => 250.0,
        Some(DwellingType::MediumHouse) => 350.0,
        Some(DwellingType::LargeHouse) => 450.0,
        Some(DwellingType::Apartment) => 200.0,
        Some(DwellingType::Office) => 300.0,
        Some(DwellingType::Commerce) => 500.0,
        Some(DwellingType::Other) => 300.0,
        None => UNKNOWN_DWELLING_KWH,
    }
}

/// Monthly increment an appliance adds (kWh)
pub fn appliance_increment(appliance: Appliance) -> f64 {
    match appliance {
        Appliance::AirConditioning => 150.0,
        Appliance::ElectricHeating => 200.0,
        Appliance::HeatPump => 100.0,
        Appliance::Refrigerator => 50.0,
        Appliance::WashingMachine => 30.0,
        Appliance::Dryer => 80.0,
        Appliance::Dishwasher => 30.0,
        Appliance::ElectricOven => 40.0,
        Appliance::Computers => 25.0,
        Appliance::LedLighting => 15.0,
        Appliance::TraditionalLighting => 40.0,
        Appliance::Pool => 120.0,
        Appliance::Jacuzzi => 80.0,
        Appliance::Other => 30.0,
    }
}

/// Base consumption of the dwelling plus the increment of every listed appliance.
///
/// Appliances are counted once each; names outside the table never reach this
/// function (they are dropped when the request is parsed).
pub fn estimate_consumption<'a, I>(dwelling_type: Option<DwellingType>, appliances: I) -> f64
where
    I: IntoIterator<Item = &'a Appliance>,
{
    let extra: f64 = appliances.into_iter().map(|a| appliance_increment(*a)).sum();
    base_consumption(dwelling_type) + extra
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::BTreeSet;

    #[rstest]
    #[case(Some(DwellingType::SmallHouse), 250.0)]
    #[case(Some(DwellingType::MediumHouse), 350.0)]
    #[case(Some(DwellingType::LargeHouse), 450.0)]
    #[case(Some(DwellingType::Apartment), 200.0)]
    #[case(Some(DwellingType::Office), 300.0)]
    #[case(Some(DwellingType::Commerce), 500.0)]
    #[case(None, 350.0)]
    fn test_base_consumption(#[case] dwelling: Option<DwellingType>, #[case] expected: f64) {
        assert_eq!(estimate_consumption(dwelling, &[]), expected);
    }

    #[test]
    fn test_appliances_add_up() {
        let appliances: BTreeSet<Appliance> = [
            Appliance::AirConditioning,
            Appliance::Refrigerator,
            Appliance::ElectricHeating,
        ]
        .into_iter()
        .collect();
        let kwh = estimate_consumption(Some(DwellingType::Apartment), &appliances);
        assert_eq!(kwh, 200.0 + 150.0 + 50.0 + 200.0);
    }

    #[test]
    fn test_duplicate_appliances_in_a_set_count_once() {
        let appliances: BTreeSet<Appliance> =
            [Appliance::Pool, Appliance::Pool].into_iter().collect();
        assert_eq!(estimate_consumption(None, &appliances), 350.0 + 120.0);
    }
}
