use std::collections::HashSet;

use crate::error::{AppError, AppResult};
use crate::services::{DrawResult, PersonPool, PrizeRegistry};

/// 提交抽奖结果：写入人员中奖记录并扣减奖项名额
/// 任一步失败则整体回滚，返回 CommitError
pub fn commit(
    pool: &mut PersonPool,
    registry: &mut PrizeRegistry,
    result: DrawResult,
) -> AppResult<()> {
    // 先保存会被修改的记录，失败时恢复
    let prize_backup = registry.get(&result.prize_id)?.clone();
    let person_backup: Vec<_> = result
        .winners
        .iter()
        .filter_map(|w| pool.get(w.person_id).ok().cloned())
        .collect();

    if let Err(e) = apply(pool, registry, &result) {
        for person in person_backup {
            pool.restore(person);
        }
        registry.restore(prize_backup);
        if matches!(e, AppError::Overdraw { .. }) {
            log::error!("Overdraw while committing prize {}: {e}", result.prize_id);
        }
        return Err(AppError::CommitError(format!(
            "Draw for prize {} rolled back: {e}",
            result.prize_id
        )));
    }

    log::info!(
        "Committed {} winner(s) for prize {} ({})",
        result.count(),
        result.prize_name,
        result.prize_id
    );
    Ok(())
}

fn apply(
    pool: &mut PersonPool,
    registry: &mut PrizeRegistry,
    result: &DrawResult,
) -> AppResult<()> {
    let mut seen = HashSet::new();
    for winner in &result.winners {
        if !seen.insert(winner.person_id) {
            return Err(AppError::InternalError(format!(
                "Person {} appears twice in one draw",
                winner.person_id
            )));
        }
        if pool.get(winner.person_id)?.has_won_prize(&result.prize_id) {
            return Err(AppError::InternalError(format!(
                "Person {} already holds prize {}",
                winner.person_id, result.prize_id
            )));
        }
        pool.record_win(
            winner.person_id,
            &result.prize_id,
            &result.prize_name,
            result.drawn_at,
        )?;
    }
    registry.commit(&result.prize_id, result.count())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::person_pool::tests::pool_of;
    use crate::services::prize_registry::tests::prize_request;
    use crate::services::{DrawEngine, DrawPolicy, DrawnWinner};
    use chrono::Utc;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const POLICY: DrawPolicy = DrawPolicy {
        exclude_any_win: false,
        per_draw_limit: 10,
    };

    fn winner(position: u32, person_id: i64) -> DrawnWinner {
        DrawnWinner {
            position,
            person_id,
            uuid: String::new(),
            name: String::new(),
            department: String::new(),
            avatar: None,
            guaranteed: false,
        }
    }

    fn manual_result(ids: &[i64]) -> DrawResult {
        DrawResult {
            prize_id: "p".into(),
            prize_name: "Prize p".into(),
            winners: ids
                .iter()
                .enumerate()
                .map(|(i, id)| winner(i as u32 + 1, *id))
                .collect(),
            drawn_at: Utc::now(),
        }
    }

    #[test]
    fn test_commit_records_wins_and_counts() {
        let mut pool = pool_of(10);
        let mut reg = PrizeRegistry::new();
        reg.create(prize_request("p", 6, 3)).unwrap();
        let mut rng = StdRng::seed_from_u64(2);

        let result = DrawEngine::new(&pool, &reg, POLICY)
            .draw("p", None, &mut rng)
            .unwrap();
        let ids: Vec<_> = result.winners.iter().map(|w| w.person_id).collect();
        commit(&mut pool, &mut reg, result).unwrap();

        assert_eq!(reg.get("p").unwrap().used_count, 3);
        for id in ids {
            let person = pool.get(id).unwrap();
            assert!(person.is_win);
            assert!(person.has_won_prize("p"));
            assert!(person.is_consistent());
        }
    }

    #[test]
    fn test_unknown_person_rolls_back_everything() {
        let mut pool = pool_of(3);
        let mut reg = PrizeRegistry::new();
        reg.create(prize_request("p", 6, 3)).unwrap();
        let pool_before = pool.clone();
        let reg_before = reg.clone();

        let err = commit(&mut pool, &mut reg, manual_result(&[1, 2, 42])).unwrap_err();
        assert!(matches!(err, AppError::CommitError(_)));
        assert_eq!(pool, pool_before);
        assert_eq!(reg, reg_before);
    }

    #[test]
    fn test_duplicate_prize_win_is_rejected() {
        let mut pool = pool_of(3);
        let mut reg = PrizeRegistry::new();
        reg.create(prize_request("p", 6, 3)).unwrap();
        commit(&mut pool, &mut reg, manual_result(&[1])).unwrap();

        let pool_before = pool.clone();
        let err = commit(&mut pool, &mut reg, manual_result(&[2, 1])).unwrap_err();
        assert!(matches!(err, AppError::CommitError(_)));
        assert_eq!(pool, pool_before);
        assert_eq!(pool.get(1).unwrap().win_count(), 1);
        assert_eq!(reg.get("p").unwrap().used_count, 1);
    }

    #[test]
    fn test_overdraw_rolls_back_person_updates() {
        let mut pool = pool_of(3);
        let mut reg = PrizeRegistry::new();
        reg.create(prize_request("p", 2, 2)).unwrap();
        let pool_before = pool.clone();

        let err = commit(&mut pool, &mut reg, manual_result(&[1, 2, 3])).unwrap_err();
        assert!(matches!(err, AppError::CommitError(ref msg) if msg.contains("Overdraw")));
        assert_eq!(pool, pool_before);
        assert_eq!(reg.get("p").unwrap().used_count, 0);
    }
}
