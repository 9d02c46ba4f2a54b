use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::models::{ParameterSchema, SheetField};
use crate::utils::error::{AppError, AppResult};

pub const GAME_INFO_FIELD: &str = "gameInfo";

// 将参数化的表格JSON转换为只包含 value 的形式
pub fn flatten_game_info(param_json: &str) -> AppResult<Value> {
    let parsed: Value = serde_json::from_str(param_json)?;
    let rows = match parsed.get(GAME_INFO_FIELD) {
        None | Some(Value::Null) => return Err(AppError::MissingGameInfo),
        Some(Value::Array(rows)) => rows,
        Some(_) => {
            return Err(AppError::InvalidDocument(format!(
                "{GAME_INFO_FIELD} 不是数组"
            )))
        }
    };

    let mut final_rows = Vec::with_capacity(rows.len());
    for (index, row) in rows.iter().enumerate() {
        let fields = row.as_object().ok_or_else(|| {
            AppError::InvalidDocument(format!("{GAME_INFO_FIELD}[{index}] 不是对象"))
        })?;

        let mut converted = Map::with_capacity(fields.len());
        for (name, field) in fields {
            let value = match field {
                // 只取 value，type 和 description 不做任何检查
                Value::Object(param) => param.get("value").cloned().unwrap_or(Value::Null),
                _ => {
                    return Err(AppError::InvalidDocument(format!(
                        "{GAME_INFO_FIELD}[{index}].{name} 不是参数对象"
                    )))
                }
            };
            converted.insert(name.clone(), value);
        }
        final_rows.push(Value::Object(converted));
    }

    let mut root = Map::new();
    root.insert(GAME_INFO_FIELD.to_string(), Value::Array(final_rows));
    Ok(Value::Object(root))
}

// 转换后反序列化为调用方的目标类型
pub fn convert_game_info<T: DeserializeOwned>(param_json: &str) -> AppResult<T> {
    let flattened = flatten_game_info(param_json)?;
    let final_json = serde_json::to_string(&flattened)?;
    log::debug!("转换后的表格数据: {}", final_json);
    serde_json::from_str(&final_json).map_err(AppError::TypeConversion)
}

// 取第一行作为表头来源，所有行的结构视为一致
fn first_row(param_json: &str) -> AppResult<Option<Map<String, Value>>> {
    let mut parsed: Value = serde_json::from_str(param_json)?;
    let rows = match parsed.get_mut(GAME_INFO_FIELD).map(Value::take) {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Array(rows)) => rows,
        Some(_) => {
            return Err(AppError::InvalidDocument(format!(
                "{GAME_INFO_FIELD} 不是数组"
            )))
        }
    };

    match rows.into_iter().next() {
        None => Ok(None),
        Some(Value::Object(row)) => Ok(Some(row)),
        Some(_) => Err(AppError::InvalidDocument(format!(
            "{GAME_INFO_FIELD}[0] 不是对象"
        ))),
    }
}

// 字符串原样返回，数字和布尔值转为文本，缺失或 null 为空字符串
fn attribute_text(field: &Value, attribute: &str) -> String {
    match field.get(attribute) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}

fn parameter_attribute_list(param_json: &str, attribute: &str) -> AppResult<Option<Vec<String>>> {
    Ok(first_row(param_json)?.map(|row| {
        row.values()
            .map(|field| attribute_text(field, attribute))
            .collect()
    }))
}

// 获取主数据的键名列表
pub fn get_parameter_key_list(param_json: &str) -> AppResult<Option<Vec<String>>> {
    Ok(first_row(param_json)?.map(|row| row.keys().cloned().collect()))
}

// 获取参数类型列表
pub fn get_parameter_type_list(param_json: &str) -> AppResult<Option<Vec<String>>> {
    parameter_attribute_list(param_json, "type")
}

// 获取参数说明列表
pub fn get_parameter_description_list(param_json: &str) -> AppResult<Option<Vec<String>>> {
    parameter_attribute_list(param_json, "description")
}

// 第一行的完整参数定义，与上面的列表一样宽松
pub fn get_parameter_fields(param_json: &str) -> AppResult<Option<Vec<(String, SheetField)>>> {
    Ok(first_row(param_json)?.map(|row| {
        row.into_iter()
            .map(|(name, field)| {
                let sheet_field = SheetField {
                    field_type: attribute_text(&field, "type"),
                    description: attribute_text(&field, "description"),
                    value: field.get("value").cloned().unwrap_or(Value::Null),
                };
                (name, sheet_field)
            })
            .collect()
    }))
}

pub fn parameter_schema(param_json: &str) -> AppResult<Option<ParameterSchema>> {
    let Some(fields) = get_parameter_fields(param_json)? else {
        return Ok(None);
    };

    let mut schema = ParameterSchema::default();
    for (name, field) in fields {
        schema.keys.push(name);
        schema.types.push(field.field_type);
        schema.descriptions.push(field.description);
    }
    Ok(Some(schema))
}
