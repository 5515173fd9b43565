// ============================================================================
// HodlBoard - Client TUI du crypto advisor
// ============================================================================
// Login, quiz d'onboarding, dashboard du jour et votes par section
//
// CONCEPTS RUST CLÉS :
// 1. Terminal raw mode : contrôle total du terminal
// 2. Event loop : boucle infinie qui gère événements et rendering
// 3. Async dans sync : le worker thread possède un tokio::runtime::Runtime
// 4. Ownership : la Session vit dans le worker, l'UI ne reçoit que des copies
// ============================================================================

use std::io;
use std::sync::{mpsc, Arc, Mutex, PoisonError};

use anyhow::{Context, Result};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{debug, error, info, warn};

use hodlboard::api::{Credentials, HttpAdvisorClient};
use hodlboard::app::{App, Screen, SessionUpdate};
use hodlboard::config::Settings;
use hodlboard::ledger::Vote;
use hodlboard::models::Preferences;
use hodlboard::session::{Route, Session, StatusLine};
use hodlboard::ui::{events::EventHandler, render};
use hodlboard::view_model::VoteTarget;

// ============================================================================
// AppCommand : Commandes pour le worker thread
// ============================================================================
// CONCEPT RUST : Command pattern avec channels
// - L'event loop envoie des commandes au worker thread
// - Le worker thread exécute les appels réseau sur sa Session
// - Communication via mpsc channels (multi-producer, single-consumer)
// ============================================================================

/// Commandes envoyées au worker thread
#[derive(Debug, Clone)]
enum AppCommand {
    /// Options du quiz (listes de secours si le backend ne répond pas)
    LoadOptions,

    Register { credentials: Credentials },

    Login { credentials: Credentials },

    /// Enregistre le brouillon du quiz puis charge le dashboard
    SavePreferences { prefs: Preferences },

    LoadDashboard,

    /// Vote sur une cible encore ouverte
    Vote { target: VoteTarget, vote: Vote },

    Logout,
}

/// Résultats renvoyés par le worker thread
#[derive(Debug)]
enum AppResult {
    /// Nouvel état de la session à afficher
    Updated {
        update: SessionUpdate,
        /// Register réussi : on vide les champs du formulaire
        registered: bool,
    },

    /// Le worker ne peut pas démarrer
    WorkerFailed { error: String },
}

// ============================================================================
// Initialisation du logging
// ============================================================================
// CONCEPT : Logging dans une app TUI
// - Les println! ne fonctionnent pas une fois le TUI lancé
// - On log vers un fichier à la place, avec rotation quotidienne
// ============================================================================

/// Initialise le système de logging vers fichier
///
/// Les logs sont écrits dans `<HODLBOARD_LOG_DIR>/hodlboard.log` (./logs par
/// défaut).
///
/// # Utilisation
/// ```bash
/// tail -f ./logs/hodlboard.log.*
/// RUST_LOG=hodlboard=trace cargo run
/// ```
fn init_logging(settings: &Settings) -> Result<()> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let log_dir = settings.log_dir.clone();

    std::fs::create_dir_all(&log_dir).context("Échec de la création du répertoire de logs")?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir.clone(), "hodlboard.log");

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true)
                .with_line_number(true),
        )
        .with(
            // Par défaut : debug pour hodlboard, info pour les dépendances
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hodlboard=debug,info".into()),
        )
        .init();

    info!(?log_dir, "Logging initialisé");
    Ok(())
}

// ============================================================================
// Point d'entrée du programme
// ============================================================================

fn main() -> Result<()> {
    let settings = Settings::from_env()?;

    init_logging(&settings).unwrap_or_else(|e| {
        eprintln!("⚠️  Warning: Failed to initialize logging: {}", e);
        eprintln!("   Continuing without logging...");
    });

    info!(api_url = %settings.api_url, policy = ?settings.refresh_policy, "HodlBoard starting up");

    // Le client est construit avant le TUI : une erreur s'affiche en clair
    let client = HttpAdvisorClient::new(&settings)?;
    let session = Session::new(client, settings.refresh_policy);

    debug!("Setting up terminal");
    let mut terminal = setup_terminal()?;

    // CONCEPT RUST : Arc<Mutex<>> pour partage entre la boucle et le rendu
    let app = Arc::new(Mutex::new(App::new()));

    let (command_tx, command_rx) = mpsc::channel::<AppCommand>();
    let (result_tx, result_rx) = mpsc::channel::<AppResult>();

    info!("Spawning background worker thread");
    spawn_background_worker(session, command_rx, result_tx);

    // Les options du quiz se chargent pendant que l'utilisateur se connecte
    let _ = command_tx.send(AppCommand::LoadOptions);

    let events = EventHandler::new();

    info!("Starting event loop");
    let result = run(&mut terminal, app, &events, command_tx, result_rx);

    // Restaure le terminal (même en cas d'erreur)
    debug!("Restoring terminal");
    restore_terminal(&mut terminal)?;

    match &result {
        Ok(_) => info!("Application exited normally"),
        Err(e) => error!(error = ?e, "Application exited with error"),
    }

    result
}

// ============================================================================
// Background Worker Thread
// ============================================================================
// CONCEPT RUST : Ownership transférée au thread
// - `move` donne la Session au worker : aucun verrou nécessaire
// - Chaque commande est traitée jusqu'au bout avant la suivante
// - Après chaque étape visible, une copie de l'état est renvoyée à l'UI
// ============================================================================

fn spawn_background_worker(
    mut session: Session<HttpAdvisorClient>,
    command_rx: mpsc::Receiver<AppCommand>,
    result_tx: mpsc::Sender<AppResult>,
) {
    std::thread::spawn(move || {
        let runtime = match tokio::runtime::Runtime::new() {
            Ok(runtime) => runtime,
            Err(e) => {
                error!(error = ?e, "Failed to create tokio runtime");
                let _ = result_tx.send(AppResult::WorkerFailed {
                    error: e.to_string(),
                });
                return;
            }
        };

        let publish = |session: &Session<HttpAdvisorClient>, registered: bool| {
            let _ = result_tx.send(AppResult::Updated {
                update: SessionUpdate::capture(session),
                registered,
            });
        };

        // CONCEPT RUST : while let sur un Receiver
        // - recv() renvoie Err quand tous les Sender sont fermés
        while let Ok(command) = command_rx.recv() {
            info!(command = command_name(&command), "Worker received command");

            match command {
                AppCommand::LoadOptions => {
                    runtime.block_on(session.load_options());
                    publish(&session, false);
                }

                AppCommand::Register { credentials } => {
                    let result = runtime.block_on(session.register(credentials));
                    publish(&session, result.is_ok());
                }

                AppCommand::Login { credentials } => {
                    let result = runtime.block_on(session.login(credentials));
                    if let Ok(route) = result {
                        if route == Route::Dashboard {
                            publish(&session, false);
                            let _ = runtime.block_on(session.load_dashboard());
                        }
                    }
                    publish(&session, false);
                }

                AppCommand::SavePreferences { prefs } => {
                    *session.draft_mut() = prefs;
                    let _ = runtime.block_on(session.save_preferences());
                    publish(&session, false);
                }

                AppCommand::LoadDashboard => {
                    let _ = runtime.block_on(session.load_dashboard());
                    publish(&session, false);
                }

                AppCommand::Vote { target, vote } => {
                    // Phase 1 visible tout de suite : l'item est verrouillé
                    if let Some(pending) = session.begin_vote(&target, vote) {
                        publish(&session, false);
                        let result = runtime.block_on(session.submit_vote(&pending));
                        let outcome = runtime.block_on(session.finish_vote(pending, result));
                        debug!(?outcome, "Vote finished");
                    }
                    publish(&session, false);
                }

                AppCommand::Logout => {
                    session.logout();
                    publish(&session, false);
                }
            }
        }

        info!("Worker thread exiting (channel closed)");
    });
}

/// Nom de la commande pour les logs (sans jamais le mot de passe)
fn command_name(command: &AppCommand) -> &'static str {
    match command {
        AppCommand::LoadOptions => "load_options",
        AppCommand::Register { .. } => "register",
        AppCommand::Login { .. } => "login",
        AppCommand::SavePreferences { .. } => "save_preferences",
        AppCommand::LoadDashboard => "load_dashboard",
        AppCommand::Vote { .. } => "vote",
        AppCommand::Logout => "logout",
    }
}

// ============================================================================
// Event Loop
// ============================================================================

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: Arc<Mutex<App>>,
    events: &EventHandler,
    command_tx: mpsc::Sender<AppCommand>,
    result_rx: mpsc::Receiver<AppResult>,
) -> Result<()> {
    // Un Mutex empoisonné garde des données lisibles : on continue avec
    let lock = || app.lock().unwrap_or_else(PoisonError::into_inner);

    loop {
        if !lock().is_running() {
            break;
        }

        // 1. Applique tous les résultats du worker disponibles
        loop {
            match result_rx.try_recv() {
                Ok(AppResult::Updated { update, registered }) => {
                    let mut app_lock = lock();
                    if registered {
                        app_lock.clear_credentials();
                    }
                    app_lock.apply_update(update);
                }
                Ok(AppResult::WorkerFailed { error }) => {
                    let mut app_lock = lock();
                    app_lock.status = StatusLine::Error(error);
                    app_lock.is_loading = false;
                }
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => {
                    warn!("Worker thread disconnected");
                    break;
                }
            }
        }

        // 2. Dessine l'interface
        terminal.draw(|frame| {
            let app_lock = lock();
            render(frame, &app_lock);
        })?;

        // 3. Gère le prochain événement (Tick après 250ms sans touche)
        match events.next() {
            Ok(event) => {
                let mut app_lock = lock();
                handle_event(&mut app_lock, event, &command_tx);
            }
            Err(e) => debug!(error = ?e, "Failed to read terminal event"),
        }
    }

    Ok(())
}

// ============================================================================
// Gestion des événements
// ============================================================================
// CONCEPT RUST : Match guards par écran
// - Sur le login, les lettres sont du texte : Esc sert à quitter
// - Ailleurs, 'q' quitte (confirmation en deux temps)
// ============================================================================

fn handle_event(app: &mut App, event: hodlboard::ui::events::Event, command_tx: &mpsc::Sender<AppCommand>) {
    use hodlboard::ui::events::{is_escape_event, is_quit_event, Event};

    if matches!(event, Event::Tick) {
        return;
    }

    let quit_pressed = match app.current_screen {
        Screen::Login => is_escape_event(&event),
        Screen::Onboarding | Screen::Dashboard => is_quit_event(&event),
    };

    if quit_pressed {
        if app.is_awaiting_quit_confirmation() {
            info!("User confirmed quit");
            app.quit();
        } else {
            info!("User requested quit (awaiting confirmation)");
            app.request_quit();
        }
        return;
    }

    // N'importe quelle autre touche annule la confirmation
    app.cancel_quit();

    match app.current_screen {
        Screen::Login => handle_login_event(app, &event, command_tx),
        Screen::Onboarding => handle_onboarding_event(app, &event, command_tx),
        Screen::Dashboard => handle_dashboard_event(app, &event, command_tx),
    }
}

fn handle_login_event(app: &mut App, event: &hodlboard::ui::events::Event, command_tx: &mpsc::Sender<AppCommand>) {
    use hodlboard::ui::events::{
        get_char_from_event, is_backspace_event, is_enter_event, is_register_event, is_tab_event,
    };

    if is_tab_event(event) {
        app.focus_next_field();
    } else if is_backspace_event(event) {
        app.backspace();
    } else if is_enter_event(event) || is_register_event(event) {
        let Some(credentials) = app.credentials() else {
            app.status = StatusLine::Error("Please enter a username and a password.".to_string());
            return;
        };

        app.start_loading();
        let command = if is_register_event(event) {
            info!(username = %credentials.username, "User requested registration");
            AppCommand::Register { credentials }
        } else {
            info!(username = %credentials.username, "User requested login");
            AppCommand::Login { credentials }
        };
        let _ = command_tx.send(command);
    } else if let Some(c) = get_char_from_event(event) {
        app.append_char(c);
    }
}

fn handle_onboarding_event(app: &mut App, event: &hodlboard::ui::events::Event, command_tx: &mpsc::Sender<AppCommand>) {
    use hodlboard::ui::events::{
        is_down_event, is_enter_event, is_left_event, is_logout_event, is_right_event,
        is_space_event, is_up_event, toggle_from_event,
    };

    if is_up_event(event) {
        app.asset_up();
    } else if is_down_event(event) {
        app.asset_down();
    } else if is_space_event(event) {
        app.toggle_current_asset();
    } else if is_left_event(event) {
        app.cycle_investor_type(false);
    } else if is_right_event(event) {
        app.cycle_investor_type(true);
    } else if let Some(key) = toggle_from_event(event) {
        app.toggle_content(key);
    } else if is_logout_event(event) {
        info!("User requested logout");
        let _ = command_tx.send(AppCommand::Logout);
    } else if is_enter_event(event) {
        // Validation locale : pas d'appel réseau si le brouillon est incomplet
        if let Err(e) = app.draft.validate_with(&app.options) {
            app.status = StatusLine::Error(e.to_string());
            return;
        }
        info!(assets = app.draft.crypto_assets.len(), "User submitted preferences");
        app.start_loading();
        let _ = command_tx.send(AppCommand::SavePreferences {
            prefs: app.draft.clone(),
        });
    }
}

fn handle_dashboard_event(app: &mut App, event: &hodlboard::ui::events::Event, command_tx: &mpsc::Sender<AppCommand>) {
    use hodlboard::ui::events::{
        is_down_event, is_logout_event, is_refresh_event, is_up_event, vote_from_event,
    };

    if is_up_event(event) {
        app.navigate_up();
    } else if is_down_event(event) {
        app.navigate_down();
    } else if is_refresh_event(event) {
        info!("User requested dashboard refresh");
        app.start_loading();
        let _ = command_tx.send(AppCommand::LoadDashboard);
    } else if is_logout_event(event) {
        info!("User requested logout");
        let _ = command_tx.send(AppCommand::Logout);
    } else if let Some(vote) = vote_from_event(event) {
        // Item déjà voté (ou sans contentId) : la touche est ignorée
        match app.votable_selection() {
            Some(target) => {
                info!(key = %target.key, %vote, "User voted");
                app.mark_voting(vote);
                let _ = command_tx.send(AppCommand::Vote { target, vote });
            }
            None => debug!("No open vote target selected"),
        }
    }
}

// ============================================================================
// Setup et restauration du terminal
// ============================================================================

fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);

    Terminal::new(backend).map_err(|e| e.into())
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;

    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;

    terminal.show_cursor()?;

    Ok(())
}
