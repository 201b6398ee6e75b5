//! Price history for one property

use crate::analysis::field::Field;
use crate::ingestion::types::TenancyRecord;
use chrono::NaiveDate;
use serde::Serialize;

/// One contract period of a property, as plotted on the price timeline
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricePoint {
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub annual_amount: i64,
    pub contract_amount: i64,
    pub version: Field<String>,
}

/// Every contract for `property_id` in source order (chronological per property)
pub fn price_history(records: &[TenancyRecord], property_id: i64) -> Vec<PricePoint> {
    records
        .iter()
        .filter(|r| r.property_id == property_id)
        .map(|r| PricePoint {
            start_date: r.start_date,
            end_date: r.end_date,
            annual_amount: r.annual_amount,
            contract_amount: r.contract_amount,
            version: Field::cloned_from(&r.version),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::fixtures::{date, mock_record};

    #[test]
    fn test_price_history_for_one_property() {
        let later = TenancyRecord {
            start_date: date(2022, 1, 2),
            end_date: None,
            annual_amount: 97000,
            contract_amount: 97000,
            version: None,
            ..mock_record(2, 1001)
        };
        let records = vec![mock_record(1, 1001), mock_record(1, 1002), later];

        let history = price_history(&records, 1001);
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].start_date, date(2021, 1, 1));
        assert_eq!(history[0].annual_amount, 90000);
        assert_eq!(history[0].version, Field::Value("New".to_string()));
        assert_eq!(history[1].annual_amount, 97000);
        assert_eq!(history[1].end_date, None);
        assert!(history[1].version.is_missing());

        assert!(history.windows(2).all(|w| w[0].start_date <= w[1].start_date));
    }

    #[test]
    fn test_unknown_property_has_no_history() {
        let records = vec![mock_record(1, 1001)];
        assert!(price_history(&records, 4242).is_empty());
    }
}
