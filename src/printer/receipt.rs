//! Receipt text.

use crate::relic::{Relic, RelicId};

const HEADER: &str = "\
༘˚⋆𐙚｡⋆𖦹.✧˚YOU HAVE JUST CREATED YOUR DIGITAL RELIC ༘˚⋆𐙚｡⋆𖦹.✧˚

This relic is minted without value.
It is a record of your presence,
a smudge of light archived in code.

And yet—
the blockchain refuses valuelessness.
It waits to assign a price,
to drag this relic into markets.

Scan the QR code below
to see your relic in the archive.
Claim it, keep it, ignore it,
but know: it will always resist
our wish for no-price.
";

const FOOTER: &str = "
⠀:¨ ·.· ¨:⠀
⠀ `· . ୨୧⠀
";

/// The fields printed for one relic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub relic_id: RelicId,
    pub timestamp: String,
    pub nft_url: Option<String>,
}

impl Receipt {
    /// Receipt for a relic in its current state.
    pub fn for_relic(relic: &Relic) -> Self {
        Self {
            relic_id: relic.id,
            timestamp: relic.timestamp.clone(),
            nft_url: relic.printable_nft_url().map(str::to_string),
        }
    }

    pub fn render(&self) -> String {
        let mut text = String::with_capacity(HEADER.len() + FOOTER.len() + 128);
        text.push('\n');
        text.push_str(HEADER);
        text.push('\n');
        text.push_str(&format!("DIGITAL RELIC NUMBER: {}\n", self.relic_id));
        text.push_str(&format!("DATE: {}\n", self.timestamp));
        if let Some(url) = &self.nft_url {
            text.push_str(&format!("\nNFT URL: {}\n", url));
        }
        text.push_str(FOOTER);
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_with_url() {
        let receipt = Receipt {
            relic_id: RelicId::new(5),
            timestamp: "2025-03-01 19:45".into(),
            nft_url: Some("https://zora.co/collect/zora:0xabc/5".into()),
        };
        let text = receipt.render();
        assert!(text.contains("DIGITAL RELIC NUMBER: 005\n"));
        assert!(text.contains("DATE: 2025-03-01 19:45\n"));
        assert!(text.contains("NFT URL: https://zora.co/collect/zora:0xabc/5\n"));
    }

    #[test]
    fn test_render_without_url() {
        let receipt = Receipt {
            relic_id: RelicId::new(12),
            timestamp: "t".into(),
            nft_url: None,
        };
        let text = receipt.render();
        assert!(text.contains("DIGITAL RELIC NUMBER: 012"));
        assert!(!text.contains("NFT URL"));
    }
}
