//! Display helpers for account ids, balances and explorer links.

use paylink_types::{Amount, NetworkId};

/// Shorten an account id for display: `GA5Z...KZVN`.
pub fn truncate_address(address: &str, chars: usize) -> String {
    if address.len() <= chars * 2 {
        return address.to_string();
    }
    format!("{}...{}", &address[..chars], &address[address.len() - chars..])
}

/// Render an amount with `decimals` fractional digits (at most 7).
pub fn format_balance(amount: Amount, decimals: usize) -> String {
    let full = amount.to_string();
    let decimals = decimals.min(7);
    match full.split_once('.') {
        Some((whole, _)) if decimals == 0 => whole.to_string(),
        Some((whole, frac)) => format!("{whole}.{}", &frac[..decimals]),
        None => full,
    }
}

/// Public explorer page for a settled transaction.
pub fn explorer_url(network: NetworkId, tx_hash: &str) -> String {
    format!(
        "https://stellar.expert/explorer/{}/tx/{}",
        network.explorer_segment(),
        tx_hash
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_long_addresses() {
        let addr = "GA5ZSEJYB37JRC5AVCIA5MOP4RHTM335X2KGX3IHOJAPP5RE34K4KZVN";
        assert_eq!(truncate_address(addr, 4), "GA5Z...KZVN");
        assert_eq!(truncate_address("GABC", 4), "GABC");
    }

    #[test]
    fn balance_precision() {
        let a = Amount::parse("12.3456789").unwrap();
        assert_eq!(format_balance(a, 2), "12.34");
        assert_eq!(format_balance(a, 7), "12.3456789");
        assert_eq!(format_balance(a, 0), "12");
    }

    #[test]
    fn explorer_links_per_network() {
        assert_eq!(
            explorer_url(NetworkId::Testnet, "abc"),
            "https://stellar.expert/explorer/testnet/tx/abc"
        );
        assert!(explorer_url(NetworkId::Mainnet, "abc").contains("/public/"));
    }
}
