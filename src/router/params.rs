use percent_encoding::percent_decode_str;

/// 라우터가 현재 요청에 대해 매칭한 경로 파라미터
///
/// `/genes/{id}`로 등록된 라우트에 `/genes/DDB_G0267364` 요청이 들어오면
/// `params.get("id")`는 `Some("DDB_G0267364")`를 반환합니다. 값은
/// 퍼센트 디코딩된 상태로 저장됩니다.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Params {
    entries: Vec<(String, String)>,
}

impl Params {
    pub(crate) fn from_match(params: &matchit::Params<'_, '_>) -> Self {
        Self {
            entries: params
                .iter()
                .map(|(k, v)| {
                    let value = percent_decode_str(v).decode_utf8_lossy().into_owned();
                    (k.to_owned(), value)
                })
                .collect(),
        }
    }

    /// 이름으로 파라미터 값을 찾습니다.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// 등록 순서대로 (이름, 값)을 순회합니다.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
