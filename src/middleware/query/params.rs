use std::collections::HashMap;

use crate::middleware::Request;

/// 리소스 타입 하나에 대해 요청된 필드 이름 목록 (sparse fieldset)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldSet {
    fields: Vec<String>,
}

impl FieldSet {
    /// 쉼표로 구분된 값을 필드 목록으로 변환합니다.
    pub fn parse(value: &str) -> Self {
        Self {
            fields: split_list(value),
        }
    }

    pub fn get_all(&self) -> &[String] {
        &self.fields
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f == field)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for FieldSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(Into::into).collect(),
        }
    }
}

pub(super) fn split_list(value: &str) -> Vec<String> {
    value.split(',').map(String::from).collect()
}

/// JSON:API 쿼리 파라미터 (`include`, `fields[...]`, `filter[...]`)
///
/// [`QueryParser`](super::QueryParser)가 요청마다 새로 만들어 요청
/// extensions에 저장하며, 다운스트림 핸들러는 읽기만 합니다.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QueryParams {
    /// `include=a,b,c`
    pub includes: Vec<String>,
    pub has_includes: bool,
    /// `fields[type]=a,b`
    pub sparse_fields: HashMap<String, FieldSet>,
    pub has_sparse_fields: bool,
    /// `filter[key]=value`
    pub filters: HashMap<String, String>,
    pub has_filters: bool,
}

impl QueryParams {
    /// 요청에 저장된 쿼리 파라미터를 반환합니다.
    ///
    /// `None`이면 특별한 쿼리 처리가 요청되지 않은 것입니다.
    pub fn from_request(req: &Request) -> Option<&Self> {
        req.extensions().get::<Self>()
    }

    /// 하나 이상의 파라미터가 설정되었는지 여부
    pub fn is_populated(&self) -> bool {
        self.has_includes || self.has_sparse_fields || self.has_filters
    }

    pub(super) fn set_includes(&mut self, value: &str) {
        self.includes = split_list(value);
        self.has_includes = true;
    }

    pub(super) fn insert_fields(&mut self, resource: String, value: &str) {
        self.sparse_fields.insert(resource, FieldSet::parse(value));
        self.has_sparse_fields = true;
    }

    pub(super) fn insert_filter(&mut self, key: String, value: String) {
        self.filters.insert(key, value);
        self.has_filters = true;
    }
}
