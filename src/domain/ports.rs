use crate::domain::model::{DashboardReport, InputSource, SourceData};
use crate::domain::services::ServiceabilityConfig;
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn input_source(&self) -> InputSource;
    fn output_path(&self) -> &str;
    fn compress_output(&self) -> bool;
    fn serviceability(&self) -> ServiceabilityConfig;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<SourceData>;
    async fn transform(&self, data: SourceData) -> Result<DashboardReport>;
    async fn load(&self, report: DashboardReport) -> Result<String>;
}
