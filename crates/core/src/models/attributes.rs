use serde_json::Value;

/// 调度器返回的无模式属性映射 (ClassAd属性名 -> 值)
pub type Attributes = serde_json::Map<String, Value>;

/// 按字段类型读取属性的辅助方法
///
/// 不同调度器后端返回的属性类型并不统一（例如作业ID可能是
/// `142`、`142.0` 或 `"142.0"`），这里统一做宽松转换。
pub trait AttributeAccess {
    fn str_attr(&self, key: &str) -> Option<&str>;
    fn i64_attr(&self, key: &str) -> Option<i64>;
    fn f64_attr(&self, key: &str) -> Option<f64>;
    fn bool_attr(&self, key: &str) -> Option<bool>;
    fn object_attr(&self, key: &str) -> Option<&Attributes>;
}

impl AttributeAccess for Attributes {
    fn str_attr(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    fn i64_attr(&self, key: &str) -> Option<i64> {
        match self.get(key)? {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    fn f64_attr(&self, key: &str) -> Option<f64> {
        match self.get(key)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    fn bool_attr(&self, key: &str) -> Option<bool> {
        match self.get(key)? {
            Value::Bool(b) => Some(*b),
            Value::String(s) => match s.to_ascii_lowercase().as_str() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    fn object_attr(&self, key: &str) -> Option<&Attributes> {
        self.get(key).and_then(Value::as_object)
    }
}

/// 将作业ID按 先浮点后整数 的方式转换为运行ID，`"142.0"` -> 142
pub fn coerce_job_id(raw: &str) -> Option<i64> {
    let value: f64 = raw.trim().parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    Some(value.trunc() as i64)
}
