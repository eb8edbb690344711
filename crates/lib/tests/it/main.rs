/*! Integration tests for Tooldeck.
 *
 * This test suite is organized as a single integration test binary.
 * The module structure mirrors the main library structure:
 * - store: document CRUD, entry-collection semantics, subscriptions
 * - auth: the auth-state broadcaster and provider wiring
 * - bootstrap: one-time default provisioning for fresh identities
 */

use tracing_subscriber::EnvFilter;

#[ctor::ctor]
fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("tooldeck=info".parse().unwrap()),
        )
        .with_test_writer()
        .try_init();
}

mod bootstrap;
mod helpers;
