use std::future::Future;
use std::net::SocketAddr;

use tokio::net::TcpListener;

use crate::config::Config;
use crate::prometheus::setup_metrics_recorder;
use crate::router;
use crate::stores::file::FileStore;
use crate::time::SystemTime;

pub async fn serve<F>(config: Config, listener: TcpListener, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let store = FileStore::new(config.persistence_path);

    let metrics = if config.export_prometheus {
        Some(setup_metrics_recorder()?)
    } else {
        None
    };

    let app = router::router(
        SystemTime {},
        store,
        config.body_rendering,
        config.max_body_size,
        metrics,
    );

    tracing::info!("listening on {:?}", listener.local_addr()?);
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown)
    .await?;

    Ok(())
}
