use std::sync::Arc;

use parla_config::Config;
use parla_core::Connectivity;
use parla_core::Outcome;
use parla_core::language::LanguagePair;
use tokio::sync::RwLock;

use crate::status::TranslationStats;

pub struct AppState {
    pub config: Arc<RwLock<Config>>,
    pub connectivity: Connectivity,
    pub languages: RwLock<LanguagePair>,
    /// Most recent published outcome, source for copy and playback
    pub last_outcome: RwLock<Option<Outcome>>,
    pub stats: RwLock<TranslationStats>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let connectivity = Connectivity::new(config.network.start_online);
        let languages = LanguagePair::new(
            config.session.from_lang.clone(),
            config.session.to_lang.clone(),
        );

        Self {
            config: Arc::new(RwLock::new(config)),
            connectivity,
            languages: RwLock::new(languages),
            last_outcome: RwLock::new(None),
            stats: RwLock::new(TranslationStats::default()),
        }
    }
}
