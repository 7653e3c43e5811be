use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;

use tracing::info;

use crate::{
    args::TesterArgs,
    engine::{Coordinator, LoadPlan},
    error::AppResult,
    http::{ReqwestTransport, SwipeGenerator, spawn_health_listener},
};

use super::{export, summary};

pub(crate) async fn run_local(url: &str, args: TesterArgs) -> AppResult<()> {
    let transport = ReqwestTransport::new(url, args.request_timeout)?;

    let health = match args.health_port {
        Some(port) => {
            let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, port));
            Some(spawn_health_listener(addr).await?)
        }
        None => None,
    };

    let plan = LoadPlan::from_args(&args);
    let started_at = chrono::Utc::now();
    let coordinator = Coordinator::new(plan, Arc::new(SwipeGenerator::new()), Arc::new(transport));
    let outcome = coordinator.run().await;

    if let Some((_, handle)) = health {
        handle.abort();
    }
    let report = outcome?;

    info!("Total run time: {:?}", report.summary.duration);
    info!(
        "success count: {}, error count: {}",
        report.summary.success_count, report.summary.error_count
    );
    summary::print_summary(&report.summary);

    export::write_exports(&args, &report, started_at).await?;
    Ok(())
}
