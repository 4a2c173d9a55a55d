use std::collections::HashSet;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::entities::person_entity as persons;
use crate::error::{AppError, AppResult};
use crate::models::ImportPersonItem;

/// 人员奖池：独占所有人员记录及其中奖状态
#[derive(Debug, Clone, PartialEq)]
pub struct PersonPool {
    persons: Vec<persons::Model>,
    next_id: i64,
}

impl Default for PersonPool {
    fn default() -> Self {
        Self::new()
    }
}

impl PersonPool {
    pub fn new() -> Self {
        Self {
            persons: Vec::new(),
            next_id: 1,
        }
    }

    /// 从持久化数据恢复，恢复前校验中奖序列一致性
    pub fn from_parts(persons: Vec<persons::Model>, next_id: i64) -> AppResult<Self> {
        let mut seen = HashSet::new();
        for p in &persons {
            if !p.is_consistent() {
                return Err(AppError::ConfigError(format!(
                    "Person {} has inconsistent win history",
                    p.id
                )));
            }
            if !seen.insert(p.id) {
                return Err(AppError::ConfigError(format!("Duplicate person id {}", p.id)));
            }
        }
        let max_id = persons.iter().map(|p| p.id).max().unwrap_or(0);
        Ok(Self {
            persons,
            next_id: next_id.max(max_id + 1),
        })
    }

    pub fn persons(&self) -> &[persons::Model] {
        &self.persons
    }

    pub fn next_id(&self) -> i64 {
        self.next_id
    }

    pub fn len(&self) -> usize {
        self.persons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.persons.is_empty()
    }

    pub fn get(&self, person_id: i64) -> AppResult<&persons::Model> {
        self.persons
            .iter()
            .find(|p| p.id == person_id)
            .ok_or_else(|| AppError::NotFound(format!("Person {person_id} not found")))
    }

    fn get_mut(&mut self, person_id: i64) -> AppResult<&mut persons::Model> {
        self.persons
            .iter_mut()
            .find(|p| p.id == person_id)
            .ok_or_else(|| AppError::NotFound(format!("Person {person_id} not found")))
    }

    /// 批量导入人员，uuid 缺省时自动生成
    pub fn import(
        &mut self,
        items: Vec<ImportPersonItem>,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<persons::Model>> {
        let mut uuids: HashSet<String> = self.persons.iter().map(|p| p.uuid.clone()).collect();
        let mut created = Vec::with_capacity(items.len());
        let mut next_id = self.next_id;

        for item in items {
            if item.name.trim().is_empty() {
                return Err(AppError::ValidationError("Person name is required".into()));
            }
            let uuid = item
                .uuid
                .filter(|u| !u.is_empty())
                .unwrap_or_else(|| Uuid::new_v4().to_string());
            if !uuids.insert(uuid.clone()) {
                return Err(AppError::ValidationError(format!(
                    "Duplicate person uuid {uuid}"
                )));
            }

            let mut person = persons::Model::new(next_id, item.uid, uuid, item.name, now);
            person.department = item.department.unwrap_or_default();
            person.identity = item.identity.unwrap_or_default();
            person.avatar = item.avatar;
            person.x = item.x.unwrap_or_default();
            person.y = item.y.unwrap_or_default();
            next_id += 1;
            created.push(person);
        }

        // 全部校验通过后再写入
        self.next_id = next_id;
        self.persons.extend(created.iter().cloned());
        Ok(created)
    }

    /// 抽奖候选人
    /// - exclude_already_won_this_prize: 排除已中过本奖项的人
    /// - exclude_any_win: 排除中过任意奖项的人
    pub fn eligible(
        &self,
        prize_id: &str,
        exclude_already_won_this_prize: bool,
        exclude_any_win: bool,
    ) -> Vec<&persons::Model> {
        self.persons
            .iter()
            .filter(|p| !(exclude_already_won_this_prize && p.has_won_prize(prize_id)))
            .filter(|p| !(exclude_any_win && p.is_win))
            .collect()
    }

    /// 记录一次中奖。调用方保证同一事件只调用一次
    pub fn record_win(
        &mut self,
        person_id: i64,
        prize_id: &str,
        prize_name: &str,
        at: DateTime<Utc>,
    ) -> AppResult<()> {
        let person = self.get_mut(person_id)?;
        person.push_win(prize_id, prize_name, at);
        Ok(())
    }

    /// 清空所有人的中奖信息，不删除人员
    pub fn reset_wins(&mut self) {
        for person in &mut self.persons {
            person.clear_wins();
        }
    }

    pub fn remove(&mut self, person_id: i64) -> AppResult<persons::Model> {
        let idx = self
            .persons
            .iter()
            .position(|p| p.id == person_id)
            .ok_or_else(|| AppError::NotFound(format!("Person {person_id} not found")))?;
        Ok(self.persons.remove(idx))
    }

    /// 删除全部人员
    pub fn clear(&mut self) -> usize {
        let removed = self.persons.len();
        self.persons.clear();
        removed
    }

    /// 回滚用：用旧记录覆盖同 id 的人员
    pub(crate) fn restore(&mut self, person: persons::Model) {
        if let Some(slot) = self.persons.iter_mut().find(|p| p.id == person.id) {
            *slot = person;
        }
    }
}
