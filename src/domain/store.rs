use crate::domain::model::{ProxySettings, Service, Snapshot};
use crate::domain::ports::ServiceStore;

/// In-memory store; services keep the order in which they were first added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    services: Vec<Service>,
    proxy: Option<ProxySettings>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 直接載入快照內容，不經過 reconcile（用於讀取已持久化的設定庫）
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        let mut store = Self::new();
        for service in snapshot.services {
            store.upsert_service(service);
        }
        store.proxy = snapshot.proxy;
        store
    }

    pub fn to_snapshot(&self) -> Snapshot {
        Snapshot {
            services: self.services.clone(),
            proxy: self.proxy.clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    pub fn delete_service(&mut self, name: &str) -> Option<Service> {
        let idx = self.services.iter().position(|s| s.name == name)?;
        Some(self.services.remove(idx))
    }

    pub fn clear(&mut self) {
        self.services.clear();
        self.proxy = None;
    }
}

impl ServiceStore for MemoryStore {
    fn get_service_by_name(&self, name: &str) -> Option<&Service> {
        self.services.iter().find(|s| s.name == name)
    }

    fn list_services(&self) -> Vec<&Service> {
        self.services.iter().collect()
    }

    fn upsert_service(&mut self, service: Service) {
        match self.services.iter_mut().find(|s| s.name == service.name) {
            Some(existing) => *existing = service,
            None => self.services.push(service),
        }
    }

    fn proxy_settings(&self) -> Option<&ProxySettings> {
        self.proxy.as_ref()
    }

    fn set_proxy_settings(&mut self, settings: ProxySettings) {
        self.proxy = Some(settings);
    }
}
