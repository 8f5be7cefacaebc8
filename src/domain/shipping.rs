//! Region-based shipping table.

use rust_decimal::Decimal;

use crate::errors::{AppError, AppResult};

/// Expected shipping price keyed on the shipping address region.
///
/// A region containing `local_region` (case-insensitive) is charged the local
/// rate. Any other region, or none at all, is charged the default rate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShippingRates {
    local_region: String,
    local_rate: Decimal,
    default_rate: Decimal,
}

impl ShippingRates {
    pub fn new(local_region: String, local_rate: Decimal, default_rate: Decimal) -> Self {
        Self {
            local_region: local_region.trim().to_lowercase(),
            local_rate,
            default_rate,
        }
    }

    pub fn quote(&self, region: Option<&str>) -> Decimal {
        match region {
            Some(region)
                if !self.local_region.is_empty()
                    && region.to_lowercase().contains(&self.local_region) =>
            {
                self.local_rate
            }
            _ => self.default_rate,
        }
    }

    /// Check a caller-supplied shipping price against the table.
    pub fn verify(&self, region: Option<&str>, shipping_price: Decimal) -> AppResult<()> {
        let expected = self.quote(region);
        if shipping_price == expected {
            Ok(())
        } else {
            Err(AppError::InvalidShippingPrice { expected })
        }
    }
}

impl Default for ShippingRates {
    fn default() -> Self {
        use crate::config::{
            DEFAULT_SHIPPING_DEFAULT_RATE, DEFAULT_SHIPPING_LOCAL_RATE,
            DEFAULT_SHIPPING_LOCAL_REGION,
        };

        Self::new(
            DEFAULT_SHIPPING_LOCAL_REGION.to_string(),
            Decimal::from(DEFAULT_SHIPPING_LOCAL_RATE),
            Decimal::from(DEFAULT_SHIPPING_DEFAULT_RATE),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_local_region_matches_case_insensitively() {
        let rates = ShippingRates::default();
        assert_eq!(rates.quote(Some("Rajshahi")), dec!(50));
        assert_eq!(rates.quote(Some("Boalia, RAJSHAHI Sadar")), dec!(50));
    }

    #[test]
    fn test_other_or_missing_region_uses_default_rate() {
        let rates = ShippingRates::default();
        assert_eq!(rates.quote(Some("Dhaka")), dec!(100));
        assert_eq!(rates.quote(None), dec!(100));
    }

    #[test]
    fn test_verify_names_expected_price() {
        let rates = ShippingRates::default();
        assert!(rates.verify(Some("Rajshahi"), dec!(50)).is_ok());
        assert!(rates.verify(Some("Dhaka"), dec!(100.00)).is_ok());

        match rates.verify(Some("Rajshahi"), dec!(100)) {
            Err(AppError::InvalidShippingPrice { expected }) => assert_eq!(expected, dec!(50)),
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(matches!(
            rates.verify(None, dec!(50)),
            Err(AppError::InvalidShippingPrice { .. })
        ));
    }
}
