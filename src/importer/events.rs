// ==========================================
// 表格数据导入引擎 - 生命周期事件注册表
// ==========================================
// 职责: 按事件名保存监听器（注册顺序即触发顺序）
// 说明: 两级传播（自身 + 直接父类型）由 ImporterType::fire 负责
// ==========================================

use crate::domain::ImportEvent;
use crate::importer::context::ImportContext;
use crate::importer::error::{DefinitionError, ImportError};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// 事件载荷
#[derive(Debug, Clone, Copy)]
pub enum EventPayload<'e> {
    None,
    /// row_error / import_failed
    Error(&'e ImportError),
    /// import_aborted
    Message(&'e str),
}

impl<'e> EventPayload<'e> {
    pub fn error(&self) -> Option<&'e ImportError> {
        match self {
            EventPayload::Error(e) => Some(*e),
            _ => None,
        }
    }

    pub fn message(&self) -> Option<&'e str> {
        match self {
            EventPayload::Message(m) => Some(*m),
            _ => None,
        }
    }
}

/// 事件监听器
pub type EventListener<M> =
    Arc<dyn Fn(&mut ImportContext<M>, &EventPayload<'_>) -> anyhow::Result<()> + Send + Sync>;

/// 闭包 → 监听器（让编译器按监听器签名推断闭包参数类型）
pub fn listener<M, F>(f: F) -> EventListener<M>
where
    F: Fn(&mut ImportContext<M>, &EventPayload<'_>) -> anyhow::Result<()> + Send + Sync + 'static,
{
    Arc::new(f)
}

// ==========================================
// EventRegistry - 单个导入器类型自身的监听器
// ==========================================
pub struct EventRegistry<M> {
    listeners: HashMap<ImportEvent, Vec<EventListener<M>>>,
}

impl<M> EventRegistry<M> {
    pub fn new() -> Self {
        Self {
            listeners: HashMap::new(),
        }
    }

    pub fn register(&mut self, event: ImportEvent, listener: EventListener<M>) {
        self.listeners.entry(event).or_default().push(listener);
    }

    /// 按事件名注册（未知事件名报错）
    pub fn register_named(
        &mut self,
        event_name: &str,
        listener: EventListener<M>,
    ) -> Result<ImportEvent, DefinitionError> {
        let event = event_name
            .parse::<ImportEvent>()
            .map_err(DefinitionError::UnknownEvent)?;
        self.register(event, listener);
        Ok(event)
    }

    pub fn listeners(&self, event: ImportEvent) -> &[EventListener<M>] {
        self.listeners
            .get(&event)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// 按注册顺序调用，遇到第一个失败的监听器即返回
    pub(crate) fn dispatch(
        &self,
        event: ImportEvent,
        ctx: &mut ImportContext<M>,
        payload: &EventPayload<'_>,
    ) -> Result<(), ImportError> {
        for listener in self.listeners(event) {
            listener(ctx, payload).map_err(|e| ImportError::ListenerError {
                event: event.as_str().to_string(),
                message: e.to_string(),
            })?;
        }
        Ok(())
    }

    /// 按注册顺序调用全部监听器，收集失败而不中断
    pub(crate) fn dispatch_all(
        &self,
        event: ImportEvent,
        ctx: &mut ImportContext<M>,
        payload: &EventPayload<'_>,
    ) -> Vec<ImportError> {
        let mut failures = Vec::new();
        for listener in self.listeners(event) {
            if let Err(e) = listener(ctx, payload) {
                failures.push(ImportError::ListenerError {
                    event: event.as_str().to_string(),
                    message: e.to_string(),
                });
            }
        }
        failures
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.values().all(Vec::is_empty)
    }
}

impl<M> Default for EventRegistry<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> fmt::Debug for EventRegistry<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts: HashMap<&str, usize> = self
            .listeners
            .iter()
            .map(|(event, listeners)| (event.as_str(), listeners.len()))
            .collect();
        f.debug_struct("EventRegistry")
            .field("listeners", &counts)
            .finish()
    }
}
