//! The fixed set of per-user tool documents.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Name of a tool sub-document belonging to a user.
///
/// Each signed-in user owns one document per `ToolKind`, addressed at
/// `users/{uid}/tools/{name}` and holding a single `items` collection.
/// The set is fixed; the wire names (camelCase) are part of the persisted
/// layout and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ToolKind {
    PaymentTracker,
    IncomeTracker,
    ExpenseTracker,
    ProfitLoss,
    BudgetPlanner,
    SubscriptionTracker,
    GoalTracker,
    #[serde(rename = "clientCRM")]
    ClientCrm,
    PaymentReminder,
    ClientNotes,
}

impl ToolKind {
    /// Every tool, in the order the default shape is provisioned.
    pub const ALL: [ToolKind; 10] = [
        ToolKind::PaymentTracker,
        ToolKind::IncomeTracker,
        ToolKind::ExpenseTracker,
        ToolKind::ProfitLoss,
        ToolKind::BudgetPlanner,
        ToolKind::SubscriptionTracker,
        ToolKind::GoalTracker,
        ToolKind::ClientCrm,
        ToolKind::PaymentReminder,
        ToolKind::ClientNotes,
    ];

    /// The persisted (wire) name of this tool.
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolKind::PaymentTracker => "paymentTracker",
            ToolKind::IncomeTracker => "incomeTracker",
            ToolKind::ExpenseTracker => "expenseTracker",
            ToolKind::ProfitLoss => "profitLoss",
            ToolKind::BudgetPlanner => "budgetPlanner",
            ToolKind::SubscriptionTracker => "subscriptionTracker",
            ToolKind::GoalTracker => "goalTracker",
            ToolKind::ClientCrm => "clientCRM",
            ToolKind::PaymentReminder => "paymentReminder",
            ToolKind::ClientNotes => "clientNotes",
        }
    }
}

impl std::fmt::Display for ToolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing a string that is not a known tool name.
#[derive(Debug, Clone, Error)]
#[error("unknown tool name: {0}")]
pub struct UnknownTool(pub String);

impl FromStr for ToolKind {
    type Err = UnknownTool;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ToolKind::ALL
            .into_iter()
            .find(|tool| tool.as_str() == s)
            .ok_or_else(|| UnknownTool(s.to_string()))
    }
}
