pub mod loan;
pub mod payment;
pub mod report;

use loan_tracker_core::app_state::AppState;

use crate::ledger::JsonFileStore;
use crate::Context;

/// Open the ledger and load the user's loans from it.
pub(crate) fn open_state(ctx: &Context) -> Result<(JsonFileStore, AppState), Box<dyn std::error::Error>> {
    let store = JsonFileStore::open(&ctx.ledger)?;
    let state = AppState::load(&store, ctx.user.as_str())?;
    Ok((store, state))
}
