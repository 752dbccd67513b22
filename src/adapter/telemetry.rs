use tracing_subscriber::EnvFilter;

/// 構造化ログを初期化する
/// ログレベルは `RUST_LOG` で指定し、未設定の場合は `info`
pub fn setup_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
