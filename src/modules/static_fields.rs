use crate::modules::{DataModule, ModuleData, ModuleFuture};

/// Always contributes the same configured fields.
#[derive(Debug, Clone)]
pub struct StaticModule {
    fields: ModuleData,
}

impl StaticModule {
    pub fn new(fields: ModuleData) -> Self {
        Self { fields }
    }
}

impl DataModule for StaticModule {
    fn name(&self) -> &str {
        "static"
    }

    fn collect(&self) -> ModuleFuture {
        let fields = self.fields.clone();
        Box::pin(async move { Ok(fields) })
    }
}
