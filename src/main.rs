use recruit_admin::{
    app_state::AppState,
    config::Config,
    errors::AppResult,
    services::ListRequest,
};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::init();

    if let Err(err) = run().await {
        log::error!("{} ({})", err, err.error_code());
        std::process::exit(1);
    }
}

async fn run() -> AppResult<()> {
    let config = Config::from_env();
    log::info!("Using recruitment backend at {}", config.api_base_url);

    let state = AppState::new(config)?;
    if state.session.login_required() {
        log::warn!("No session token found; requests will be rejected until login");
    }

    let filieres = state.filiere_service.list().await?;
    log::info!("{} filière(s) configured", filieres.len());

    let waiting = state.waiting_screen();
    waiting.load(ListRequest::all()).await?;
    log::info!("{} student(s) waiting for an interview", waiting.records().len());

    let ranking = state.ranking_screen();
    let scope = std::env::args().nth(1);
    ranking
        .load(match scope.as_deref() {
            Some(filiere) => ListRequest::scoped(filiere),
            None => ListRequest::all(),
        })
        .await?;

    for (rank, entry) in ranking
        .visible()
        .iter()
        .take(state.config.top_n)
        .enumerate()
    {
        log::info!(
            "#{} {} [{}] total={}",
            rank + 1,
            entry.student.full_name(),
            entry.student.filiere.as_deref().unwrap_or("-"),
            entry.total.map(|t| t.to_string()).unwrap_or_else(|| "-".to_string())
        );
    }

    Ok(())
}
