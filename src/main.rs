use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use dotenvy::dotenv;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use vehicle_rides::config::{DatabaseConfig, EnvironmentConfig, StoreBackend};
use vehicle_rides::database::DatabaseConnection;
use vehicle_rides::middleware::cors_layer;
use vehicle_rides::repositories::{MemoryVehicleStore, PgVehicleStore, VehicleStore};
use vehicle_rides::routes::create_app_router;
use vehicle_rides::services::SystemClock;
use vehicle_rides::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("🛴 Vehicle Rides - checkout / check-in");

    let config = EnvironmentConfig::from_env()?;

    let store: Arc<dyn VehicleStore> = match config.store_backend {
        StoreBackend::Postgres => {
            let db_config = DatabaseConfig::from_env()?;
            let connection = match DatabaseConnection::connect(&db_config).await {
                Ok(conn) => conn,
                Err(e) => {
                    error!("❌ Error conectando a la base de datos: {}", e);
                    return Err(anyhow::anyhow!("Error de base de datos: {}", e));
                }
            };
            Arc::new(PgVehicleStore::new(connection.pool().clone()))
        }
        StoreBackend::Memory => {
            info!("🧪 Usando almacén en memoria, los datos no persisten");
            Arc::new(MemoryVehicleStore::new())
        }
    };

    let cors = cors_layer(&config.cors_origins, config.is_development());
    let addr: SocketAddr = config.server_url().parse()?;
    let app_state = AppState::new(store, Arc::new(SystemClock), config);

    let app = create_app_router(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET    /health");
    info!("   POST   /api/vehicle - Crear vehículo");
    info!("   GET    /api/vehicle?max_vehicles=N - Listar vehículos");
    info!("   GET    /api/vehicle/:id - Vehículo con historial");
    info!("   DELETE /api/vehicle/:id - Eliminar vehículo");
    info!("   GET    /api/vehicle/:id/status - ¿En uso?");
    info!("   POST   /api/vehicle/:id/checkout - Iniciar viaje");
    info!("   POST   /api/vehicle/:id/checkin - Terminar viaje");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("❌ Error del servidor: {}", e);
        return Err(e.into());
    }

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ No se pudo instalar el handler de Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("❌ No se pudo instalar el handler de SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
