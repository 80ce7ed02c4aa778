// cargo watch -x 'fmt' -x 'run -- --host sddc-manager.rack.local'

pub mod api;
pub mod config;
pub mod dns;
pub mod models;
pub mod output;
pub mod pool;
pub mod validate;
pub mod wizard;

use api::HttpClusterApi;
use config::Config;
use dns::NslookupResolver;
use models::WizardOutput;
use wizard::{Prompter, Wizard, WizardError, WizardOptions};

/// Wizard options selected on the command line.
pub fn wizard_options(config: &Config) -> WizardOptions {
    WizardOptions {
        domain_id: config.domain_id.clone(),
        is_primary: !config.secondary,
        migration_env: config.migration_env,
    }
}

/// Run the wizard against the SDDC manager and DNS named in `config`.
pub async fn collect_spec<P: Prompter>(
    config: &Config,
    prompter: P,
) -> Result<WizardOutput, WizardError> {
    let api = HttpClusterApi::new(
        &config.base_url(),
        config.token.clone(),
        config.http_timeout(),
        config.insecure,
    )?;
    let resolver = NslookupResolver::new(config.nslookup.clone(), config.dns_timeout());
    let mut wizard = Wizard::new(prompter, api, resolver, wizard_options(config));
    wizard.run().await
}
