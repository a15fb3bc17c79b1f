//! Command line arguments shared between binaries.

#[derive(Debug, structopt::StructOpt)]
pub struct Arguments {
    #[structopt(
        long,
        env,
        default_value = "warn,auction=debug,auctioneer=debug,shared=debug"
    )]
    pub log_filter: String,
}
