use super::Evaluation;

/// True when the integer result exceeds `limit`
#[derive(Debug, Clone)]
pub struct ThresholdCondition {
    pub limit: i64,
    pub warn_when: bool,
}

impl ThresholdCondition {
    pub fn new(limit: i64, warn_when: bool) -> Self {
        Self { limit, warn_when }
    }

    pub fn evaluate(&self, value: i64) -> Evaluation {
        let result = value > self.limit;
        let description = if result {
            format!(
                "SQL query has data: value: {} is greater than {}.",
                value, self.limit
            )
        } else {
            format!(
                "SQL query does not contain data: value: {} is LTE {}.",
                value, self.limit
            )
        };
        Evaluation::new(result, description)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_is_strict() {
        let condition = ThresholdCondition::new(10, true);

        assert!(condition.evaluate(11).result);
        assert!(!condition.evaluate(10).result);
        assert!(!condition.evaluate(-3).result);
    }

    #[test]
    fn test_threshold_description() {
        let condition = ThresholdCondition::new(0, true);

        assert_eq!(
            condition.evaluate(4).description,
            "SQL query has data: value: 4 is greater than 0."
        );
        assert_eq!(
            condition.evaluate(0).description,
            "SQL query does not contain data: value: 0 is LTE 0."
        );
    }

    #[test]
    fn test_missing_value_sentinel_never_exceeds() {
        let condition = ThresholdCondition::new(i64::MIN, true);
        assert!(!condition.evaluate(i64::MIN).result);
    }
}
