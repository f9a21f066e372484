//! Module registry: maps flow keys to interactive flows and business types to
//! direct handlers. Dispatch is always by declared key, never by probing.

use crate::{BarberModule, CarwashModule, SpazaModule};
use kasibot_core::{
    BookingStore, BusinessType, Catalog, DirectHandler, InteractiveFlow, ModuleKey, OrderStore,
};
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Default)]
pub struct ModuleRegistry {
    interactive: HashMap<ModuleKey, Arc<dyn InteractiveFlow>>,
    direct: HashMap<BusinessType, Arc<dyn DirectHandler>>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_interactive(mut self, flow: Arc<dyn InteractiveFlow>) -> Self {
        self.interactive.insert(flow.key(), flow);
        self
    }

    pub fn register_direct(
        mut self,
        business_type: BusinessType,
        handler: Arc<dyn DirectHandler>,
    ) -> Self {
        self.direct.insert(business_type, handler);
        self
    }

    pub fn interactive(&self, key: ModuleKey) -> Option<&Arc<dyn InteractiveFlow>> {
        self.interactive.get(&key)
    }

    pub fn direct(&self, business_type: BusinessType) -> Option<&Arc<dyn DirectHandler>> {
        self.direct.get(&business_type)
    }
}

/// The standard registry: barber and car wash as flows and direct handlers,
/// spaza as direct-only.
pub fn standard_registry(
    catalog: Arc<dyn Catalog>,
    bookings: Arc<dyn BookingStore>,
    orders: Arc<dyn OrderStore>,
) -> ModuleRegistry {
    let barber = Arc::new(BarberModule::new(catalog.clone(), bookings.clone()));
    let carwash = Arc::new(CarwashModule::new(catalog.clone(), bookings));
    let spaza = Arc::new(SpazaModule::new(catalog, orders));

    ModuleRegistry::new()
        .register_interactive(barber.clone())
        .register_interactive(carwash.clone())
        .register_direct(BusinessType::Barber, barber)
        .register_direct(BusinessType::Carwash, carwash)
        .register_direct(BusinessType::Spaza, spaza)
}
