use serde::{Deserialize, Serialize};
use serde_json::Value;

// 参数化字段: 表格中每个单元格都带有类型和说明
#[derive(Debug, Clone, PartialEq)]
pub struct SheetField {
    pub field_type: String,
    pub description: String,
    pub value: Value,
}

/// `{ "gameInfo": [...] }` 的包装类型，可直接作为
/// [`convert_game_info`](crate::utils::sheet_json::convert_game_info) 的目标类型。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameInfoTable<T> {
    #[serde(rename = "gameInfo")]
    pub game_info: Vec<T>,
}

impl<T> Default for GameInfoTable<T> {
    fn default() -> Self {
        Self {
            game_info: Vec::new(),
        }
    }
}

// 表头信息，取自第一行
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterSchema {
    pub keys: Vec<String>,
    pub types: Vec<String>,
    pub descriptions: Vec<String>,
}

impl ParameterSchema {
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
