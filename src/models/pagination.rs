//! 分页相关的数据结构

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct PaginationParams {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: Some(1),
            page_size: Some(20),
        }
    }
}

impl PaginationParams {
    pub fn new(page: Option<u32>, per_page: Option<u32>) -> Self {
        Self {
            page,
            page_size: per_page,
        }
    }

    pub fn get_page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn get_limit(&self) -> u32 {
        self.page_size.unwrap_or(20).clamp(1, 100)
    }

    pub fn get_offset(&self) -> u64 {
        u64::from(self.get_page() - 1) * u64::from(self.get_limit())
    }

    /// 对内存中的列表分页
    pub fn paginate<T>(&self, items: Vec<T>) -> PaginatedResponse<T> {
        let total = items.len() as u64;
        let data = items
            .into_iter()
            .skip(usize::try_from(self.get_offset()).unwrap_or(usize::MAX))
            .take(self.get_limit() as usize)
            .collect();
        PaginatedResponse::new(data, self.get_page(), self.get_limit(), total)
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub page: u32,
    pub page_size: u32,
    pub total: u64,
    pub total_pages: u64,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, page: u32, page_size: u32, total: u64) -> Self {
        let total_pages = total.div_ceil(page_size.max(1) as u64).max(1);
        Self {
            data,
            page,
            page_size,
            total,
            total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_params_defaults() {
        let params = PaginationParams::new(None, None);
        assert_eq!(params.get_page(), 1);
        assert_eq!(params.get_limit(), 20);
        assert_eq!(params.get_offset(), 0);
    }

    #[test]
    fn test_paginate_slices_items() {
        let params = PaginationParams::new(Some(3), Some(10));
        let page = params.paginate((1..=25).collect::<Vec<_>>());
        assert_eq!(page.data, vec![21, 22, 23, 24, 25]);
        assert_eq!(page.total, 25);
        assert_eq!(page.total_pages, 3);
    }

    #[test]
    fn test_huge_page_is_empty_not_overflow() {
        let params = PaginationParams::new(Some(u32::MAX), Some(20));
        assert_eq!(params.get_offset(), u64::from(u32::MAX - 1) * 20);
        let page = params.paginate(vec![1, 2, 3]);
        assert!(page.data.is_empty());
        assert_eq!(page.page, u32::MAX);
        assert_eq!(page.total, 3);
    }

    #[test]
    fn test_empty_list_has_one_page() {
        let page = PaginationParams::default().paginate(Vec::<u8>::new());
        assert_eq!(page.total_pages, 1);
        assert!(page.data.is_empty());
    }
}
