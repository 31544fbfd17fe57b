use std::path::PathBuf;

use clap::Parser;

use crate::data::Collection;

#[derive(Parser, Debug)]
#[command(name = "lazyrent", version, about = "Browse apartments, tenants, craftsmen, issues and contracts")]
pub struct Args {
    /// Dataset snapshot: one JSON file or a directory of per-endpoint files
    #[arg(short, long)]
    pub data: Option<PathBuf>,

    /// Tab to open on start
    #[arg(short, long, value_enum)]
    pub screen: Option<Collection>,

    /// Initial rows per page, overriding the configured default
    #[arg(short, long)]
    pub page_size: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_flags() {
        let args = Args::parse_from([
            "lazyrent",
            "--data",
            "site.json",
            "--screen",
            "craftsmen",
            "--page-size",
            "25",
        ]);
        assert_eq!(args.data, Some(PathBuf::from("site.json")));
        assert_eq!(args.screen, Some(Collection::Craftsmen));
        assert_eq!(args.page_size, Some(25));
    }

    #[test]
    fn test_unknown_screen_rejected() {
        assert!(Args::try_parse_from(["lazyrent", "--screen", "payments"]).is_err());
    }
}
