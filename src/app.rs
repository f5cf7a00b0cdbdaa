use adw::Application;
use std::rc::Rc;
use steel_enquiry::{AppConfig, CsvFileBackend, DirectoryStore, TemplateStore};

/// Everything the windows share for the lifetime of the application.
pub struct Session {
    pub config: AppConfig,
    pub directory: DirectoryStore<CsvFileBackend>,
    pub templates: TemplateStore,
}

impl Session {
    pub fn open() -> steel_enquiry::Result<Self> {
        let config = AppConfig::load();
        let directory = DirectoryStore::open(CsvFileBackend::new(config.directory_file()))?;
        let templates = TemplateStore::new(config.template_file());
        templates.ensure_default_exists()?;
        log::info!(
            "using directory {} and template {}",
            directory.backend().path().display(),
            templates.path().display()
        );
        Ok(Self {
            config,
            directory,
            templates,
        })
    }
}

pub fn build_ui(app: &Application) {
    match Session::open() {
        Ok(session) => crate::ui::main_window::show_main_window(app, Rc::new(session)),
        Err(err) => {
            log::error!("startup failed: {}", err);
            crate::ui::main_window::show_startup_error(app, &err);
        }
    }
}
