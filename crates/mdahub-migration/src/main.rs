#[tokio::main]
async fn main() {
    sea_orm_migration::cli::run_cli(mdahub_migration::Migrator).await;
}
