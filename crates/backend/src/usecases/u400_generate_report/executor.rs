use chrono::{Local, Utc};
use contracts::domain::a006_report_artifact::ReportPeriodTag;
use contracts::shared::period::ReportRequest;
use contracts::usecases::u400_generate_report::GenerateReportResponse;
use std::time::Instant;

use crate::dashboards::{
    d400_summary_report, d401_orders_report, d402_clients_report, d403_attendance_report,
};
use crate::shared::artifacts::{build_file_name, ArtifactStore};
use crate::shared::cancel::CancelToken;
use crate::shared::config::ReportSettings;
use crate::shared::data::DataStore;
use crate::shared::error::{validate_request, ReportError};
use crate::shared::format::format_file_size;
use crate::shared::report_pdf::sections::build_sections;
use crate::shared::report_pdf::{compose, render_pdf, DocumentHeader, PageLayout};

/// Stored report plus its bytes for an immediate download
#[derive(Debug)]
pub struct GeneratedReport {
    pub response: GenerateReportResponse,
    pub bytes: Vec<u8>,
}

/// Generate the full report for `request` and store it.
///
/// The four aggregators run concurrently and the first data fetch failure
/// aborts the whole request. Nothing is stored once `cancel` has fired.
pub async fn execute(
    store: &dyn DataStore,
    artifacts: &dyn ArtifactStore,
    settings: &ReportSettings,
    request: ReportRequest,
    mut cancel: CancelToken,
) -> Result<GeneratedReport, ReportError> {
    validate_request(&request)?;

    tracing::info!(
        "Generating {} report for {}",
        request.granularity.as_str(),
        request.range_label()
    );

    let started = Instant::now();
    let aggregate = async {
        tokio::try_join!(
            d400_summary_report::service::get_summary_report(store, &request),
            d401_orders_report::service::get_orders_report(store, &request),
            d402_clients_report::service::get_clients_report(store, &request),
            d403_attendance_report::service::get_attendance_report(store, &request, settings.work_start),
        )
    };

    let (summary, orders, clients, attendance) = tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            tracing::info!("Report for {} cancelled while fetching", request.range_label());
            return Err(ReportError::Cancelled);
        }
        result = aggregate => result?,
    };
    tracing::info!("Report data for {} aggregated in {:?}", request.range_label(), started.elapsed());

    let sections = build_sections(Some(&summary), Some(&orders), Some(&clients), Some(&attendance));
    let header = DocumentHeader {
        title: settings.title.clone(),
        period_label: request.period_label(),
        range_label: request.range_label(),
        generated_at: Local::now().format("%d/%m/%Y %H:%M").to_string(),
    };
    let document = compose(&header, &sections, &PageLayout::default())?;
    let bytes = render_pdf(&document);
    tracing::info!("Composed {} pages in {:?}", document.page_count(), started.elapsed());

    if cancel.is_cancelled() {
        tracing::info!("Report for {} cancelled before saving", request.range_label());
        return Err(ReportError::Cancelled);
    }

    let period = ReportPeriodTag::parse(request.granularity.as_str());
    let file_name = build_file_name(period, request.start_date, Utc::now());
    let locator = artifacts.save(&bytes, &file_name).await?;

    tracing::info!(
        "Report {} stored: {} pages, {} bytes",
        file_name,
        document.page_count(),
        bytes.len()
    );

    Ok(GeneratedReport {
        response: GenerateReportResponse {
            file_name,
            period,
            locator,
            size_bytes: bytes.len() as u64,
            size_label: format_file_size(bytes.len() as u64),
            pages: document.page_count() as u32,
        },
        bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboards::fixtures::*;
    use crate::shared::artifacts::FsArtifactStore;
    use crate::shared::cancel::cancel_pair;
    use crate::shared::data::DataFetchError;
    use async_trait::async_trait;
    use contracts::domain::a001_order::{Order, OrderStatus};
    use contracts::domain::a002_client::Client;
    use contracts::domain::a003_staff::Staff;
    use contracts::domain::a004_attendance::Attendance;
    use contracts::shared::period::Granularity;
    use std::time::Duration;

    #[derive(Default)]
    struct FakeStore {
        orders: Vec<Order>,
        clients: Vec<Client>,
        staff: Vec<Staff>,
        attendance: Vec<Attendance>,
        fail_attendance: bool,
        hang: bool,
    }

    impl FakeStore {
        async fn gate(&self) {
            if self.hang {
                std::future::pending::<()>().await;
            }
        }
    }

    #[async_trait]
    impl DataStore for FakeStore {
        async fn query_orders(&self, _: &ReportRequest) -> Result<Vec<Order>, DataFetchError> {
            self.gate().await;
            Ok(self.orders.clone())
        }

        async fn query_clients(&self) -> Result<Vec<Client>, DataFetchError> {
            self.gate().await;
            Ok(self.clients.clone())
        }

        async fn query_staff(&self, active_only: bool) -> Result<Vec<Staff>, DataFetchError> {
            self.gate().await;
            Ok(self.staff.iter().filter(|s| !active_only || s.is_active).cloned().collect())
        }

        async fn query_attendance(&self, _: &ReportRequest) -> Result<Vec<Attendance>, DataFetchError> {
            self.gate().await;
            if self.fail_attendance {
                return Err(DataFetchError::new("attendance", "permission denied"));
            }
            Ok(self.attendance.clone())
        }
    }

    fn populated() -> FakeStore {
        let ana = client("Ana", &["Centro"], true);
        let luis = staff("Luis", true);
        FakeStore {
            orders: vec![
                order(&ana, at(6, 3, 10, 0), 100.0, OrderStatus::Liquidado, None),
                order(&ana, at(6, 4, 10, 0), 50.0, OrderStatus::Abono, Some(20.0)),
            ],
            attendance: vec![attendance(&luis, at(6, 3, 9, 15), Some(at(6, 3, 17, 0)))],
            clients: vec![ana],
            staff: vec![luis],
            ..Default::default()
        }
    }

    fn storage(dir: &tempfile::TempDir) -> (ReportSettings, FsArtifactStore) {
        let settings = ReportSettings {
            storage_dir: dir.path().to_path_buf(),
            ..Default::default()
        };
        let artifacts = FsArtifactStore::new(&settings.storage_dir, &settings.public_prefix);
        (settings, artifacts)
    }

    #[tokio::test]
    async fn test_generates_and_stores_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let (settings, artifacts) = storage(&dir);

        let report = execute(&populated(), &artifacts, &settings, june_week(), CancelToken::never())
            .await
            .unwrap();

        assert!(report.bytes.starts_with(b"%PDF-1.4"));
        assert!(report.response.file_name.starts_with("reporte_completo_weekly_2025-06-02_"));
        assert_eq!(report.response.period, ReportPeriodTag::Weekly);
        assert!(report.response.pages >= 1);
        assert_eq!(report.response.size_bytes, report.bytes.len() as u64);

        let stored = artifacts.list().await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].locator, report.response.locator);
        assert_eq!(artifacts.read(&stored[0].id).await.unwrap(), report.bytes);
    }

    #[tokio::test]
    async fn test_fetch_failure_aborts_without_storing() {
        let dir = tempfile::tempdir().unwrap();
        let (settings, artifacts) = storage(&dir);
        let store = FakeStore {
            fail_attendance: true,
            ..populated()
        };

        let err = execute(&store, &artifacts, &settings, june_week(), CancelToken::never())
            .await
            .unwrap_err();

        match err {
            ReportError::DataFetch { range, source, .. } => {
                assert_eq!(range, "02/06/2025 - 08/06/2025");
                assert_eq!(source.entity, "attendance");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(artifacts.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_inverted_range_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let (settings, artifacts) = storage(&dir);
        let request = ReportRequest::new(date(6, 8), date(6, 2), Granularity::Weekly);

        let err = execute(&populated(), &artifacts, &settings, request, CancelToken::never())
            .await
            .unwrap_err();
        assert!(matches!(err, ReportError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn test_cancel_while_fetching_stores_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let (settings, artifacts) = storage(&dir);
        let store = FakeStore {
            hang: true,
            ..populated()
        };
        let (handle, token) = cancel_pair();

        let canceller = async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            handle.cancel();
        };
        let (result, ()) = tokio::join!(
            execute(&store, &artifacts, &settings, june_week(), token),
            canceller
        );

        assert!(matches!(result, Err(ReportError::Cancelled)));
        assert!(artifacts.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_already_cancelled_request_does_no_work() {
        let dir = tempfile::tempdir().unwrap();
        let (settings, artifacts) = storage(&dir);
        let (handle, token) = cancel_pair();
        handle.cancel();

        let result = execute(&populated(), &artifacts, &settings, june_week(), token).await;

        assert!(matches!(result, Err(ReportError::Cancelled)));
        assert!(artifacts.list().await.unwrap().is_empty());
    }
}
