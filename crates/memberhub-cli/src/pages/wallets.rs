//! Wallet ledger table. Bound per wallet, so it is not a [`ListPage`](super::ListPage).

use memberhub_core::config::table::TableConfig;
use memberhub_core::types::SortOrder;
use memberhub_entity::wallet::{TransactionKind, TransactionStatus, WalletTransaction};
use memberhub_table::{ColumnType, DataTableColumn, DataTableConfig, DataTableFilter, FilterType};

use super::choices;

/// Transactions of one wallet, newest first.
pub fn transactions_table(config: &TableConfig) -> DataTableConfig<WalletTransaction> {
    DataTableConfig::new()
        .with_defaults(config)
        .column(
            DataTableColumn::new("createdAt", "Date")
                .sortable()
                .of_type(ColumnType::Datetime),
        )
        .column(DataTableColumn::new("kind", "Type").of_type(ColumnType::Status))
        .column(
            DataTableColumn::new("amount", "Amount")
                .sortable()
                .of_type(ColumnType::Currency),
        )
        .column(DataTableColumn::new("balanceAfter", "Balance").of_type(ColumnType::Currency))
        .column(DataTableColumn::new("reference", "Reference"))
        .column(DataTableColumn::new("status", "Status").of_type(ColumnType::Status))
        .filter(
            DataTableFilter::new("kind", "Type", FilterType::Multiselect)
                .with_options(choices(TransactionKind::ALL)),
        )
        .filter(
            DataTableFilter::new("status", "Status", FilterType::Select)
                .with_options(choices(TransactionStatus::ALL)),
        )
        .filter(DataTableFilter::new("createdAt", "Date", FilterType::Daterange))
        .search_fields(["reference"])
        .default_sort("createdAt", SortOrder::Desc)
}
