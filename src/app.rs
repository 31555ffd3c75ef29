use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use chrono::Local;
use color_eyre::Result;
use log::{debug, info, warn};
use ratatui::DefaultTerminal;
use staffgrid_db::{
    Employee, LeaveRequest, Loan, PayrollEntry, PreferenceStore, RecordStore,
    SqlitePreferenceStore, paths,
};
use staffgrid_ui::{
    DataTable, StatusLine,
    widgets::{modal::ModalManager, search_filter::SearchFilter},
};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender, error::TryRecvError};

use crate::{
    app_state::{AppMessage, Tab},
    config::Settings,
    services::RecordService,
    tables::{self, TableContext},
};

pub const APP_NAME: &str = "staffgrid";

/// How long the event loop waits for input before doing housekeeping.
pub const TICK_RATE: Duration = Duration::from_millis(250);

/// The main application which holds the state and logic of the application.
pub struct App {
    /// Is the application running?
    running: bool,
    pub active_tab: Tab,
    pub employees: DataTable<Employee>,
    pub leave: DataTable<LeaveRequest>,
    pub loans: DataTable<Loan>,
    pub payroll: DataTable<PayrollEntry>,
    pub search_filter: SearchFilter,
    pub modal_manager: ModalManager,
    pub status_line: StatusLine,
    pub service: RecordService,
    pub tx: UnboundedSender<AppMessage>,
    rx: UnboundedReceiver<AppMessage>,
    /// Rows waiting for the user to pick a status
    pub pending_edit: Option<(Tab, Vec<String>)>,
}

impl App {
    /// Open the stores in the platform data directory, seeding them on
    /// first run.
    pub async fn new(settings: Settings) -> Result<Self> {
        let db_path = paths::get_db_path()?;
        let store = RecordStore::open(&db_path)?;
        let month = Local::now().format("%Y-%m").to_string();
        if store.seed_if_empty(&month)? {
            info!("seeded sample records into {}", db_path.display());
        }
        let preferences: Arc<dyn PreferenceStore> =
            Arc::new(SqlitePreferenceStore::open(&db_path)?);

        Self::with_service(settings, RecordService::new(store), preferences).await
    }

    pub async fn with_service(
        settings: Settings,
        service: RecordService,
        preferences: Arc<dyn PreferenceStore>,
    ) -> Result<Self> {
        let employees = service.load::<Employee>().await?;
        let leave = service.load::<LeaveRequest>().await?;
        let loans = service.load::<Loan>().await?;
        let payroll = service.load::<PayrollEntry>().await?;
        debug!(
            "loaded {} employees, {} leave requests, {} loans, {} payroll entries",
            employees.len(),
            leave.len(),
            loans.len(),
            payroll.len()
        );

        let (tx, rx) = mpsc::unbounded_channel();
        let ctx = TableContext {
            settings,
            preferences,
            service: service.clone(),
            tx: tx.clone(),
        };

        Ok(Self {
            running: false,
            active_tab: Tab::default(),
            employees: tables::employees(employees, &ctx),
            leave: tables::leave(leave, &ctx),
            loans: tables::loans(loans, &ctx),
            payroll: tables::payroll(payroll, &ctx),
            search_filter: SearchFilter::new(),
            modal_manager: ModalManager::new(),
            status_line: StatusLine::new(),
            service,
            tx,
            rx,
            pending_edit: None,
        })
    }

    /// Run the application's main loop.
    pub fn run(mut self, mut terminal: DefaultTerminal) -> Result<()> {
        self.running = true;
        while self.is_running() {
            terminal.draw(|frame| self.render(frame))?;
            self.handle_crossterm_events()?;
            self.drain_messages();
            self.tick(Instant::now());
        }
        Ok(())
    }

    /// Handles every message that arrived since the last pass.
    pub fn drain_messages(&mut self) {
        loop {
            match self.rx.try_recv() {
                Ok(message) => self.on_message(message),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    warn!("message channel closed");
                    break;
                }
            }
        }
    }

    /// Expires row highlights on every tab.
    pub fn tick(&mut self, now: Instant) {
        for tab in Tab::ALL {
            self.table_mut(tab).tick(now);
        }
    }

    pub fn switch_tab(&mut self, tab: Tab) {
        if tab == self.active_tab {
            return;
        }
        self.active_tab = tab;
        self.search_filter.deactivate();
        self.status_line.clear();
        debug!("switched to {} tab", tab.title());
    }

    pub const fn quit(&mut self) {
        self.running = false;
    }

    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running
    }
}
