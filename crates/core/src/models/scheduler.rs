use serde::{Deserialize, Serialize};

use super::attributes::Attributes;

/// 队列管理前端 (HTCondor schedd)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scheduler {
    pub name: String,
    /// 连接地址，例如 `<192.168.1.10:9618?...>`
    pub address: Option<String>,
    /// 发现阶段返回的其余属性
    #[serde(default)]
    pub attributes: Attributes,
}

impl Scheduler {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            address: None,
            attributes: Attributes::new(),
        }
    }

    pub fn with_address<S: Into<String>>(mut self, address: S) -> Self {
        self.address = Some(address.into());
        self
    }
}
