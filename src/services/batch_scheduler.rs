use crate::error::{AppError, AppResult};
use crate::services::PrizeRegistry;

/// 本次抽取允许产生的中奖人数：min(请求人数, 剩余名额)
/// 剩余名额已包含当前批次的上限；为 0 时拒绝抽取
pub fn allowed(registry: &PrizeRegistry, prize_id: &str, requested: u32) -> AppResult<u32> {
    let remaining = registry.remaining_count(prize_id)?;
    let n = requested.min(remaining);
    if n == 0 {
        let prize = registry.get(prize_id)?;
        let reason = if prize.batches_enabled() && prize.used_count < prize.count {
            "all batches are used up"
        } else {
            "no remaining slots"
        };
        return Err(AppError::PrizeExhausted(format!("{}: {reason}", prize.name)));
    }
    Ok(n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::prize_registry::tests::{batches, prize_request};

    #[test]
    fn test_allowed_is_min_of_frequency_and_remaining() {
        let mut reg = PrizeRegistry::new();
        reg.create(prize_request("p", 7, 5)).unwrap();
        assert_eq!(allowed(&reg, "p", 5).unwrap(), 5);
        reg.commit("p", 5).unwrap();
        assert_eq!(allowed(&reg, "p", 5).unwrap(), 2);
        reg.commit("p", 2).unwrap();
        assert!(matches!(
            allowed(&reg, "p", 5),
            Err(AppError::PrizeExhausted(_))
        ));
    }

    #[test]
    fn test_batch_gate_blocks_even_with_overall_slack() {
        let mut reg = PrizeRegistry::new();
        let mut req = prize_request("p", 10, 5);
        req.separate_count = Some(batches(&[3]));
        reg.create(req).unwrap();

        assert_eq!(allowed(&reg, "p", 5).unwrap(), 3);
        reg.commit("p", 3).unwrap();
        assert!(matches!(
            allowed(&reg, "p", 5),
            Err(AppError::PrizeExhausted(_))
        ));
    }
}
