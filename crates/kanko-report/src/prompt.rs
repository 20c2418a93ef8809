//! The fixed strategy prompt template and the token-budget formulas.

/// Hard ceiling on any aggregate generation call.
const MAX_AGGREGATE_TOKENS: u32 = 32_000;

/// Token budget for an aggregate strategy report over `n_items` blocks:
/// `min(32000, 3000 + 800 * n_items)`.
#[must_use]
pub fn aggregate_token_budget(n_items: usize) -> u32 {
    let scaled = 3_000u64 + 800 * n_items as u64;
    u32::try_from(scaled.min(u64::from(MAX_AGGREGATE_TOKENS))).unwrap_or(MAX_AGGREGATE_TOKENS)
}

/// Token budget for one caption summary: `1200 + caption_chars / 8`.
#[must_use]
pub fn summary_token_budget(caption_chars: usize) -> u32 {
    let scaled = 1_200u64 + caption_chars as u64 / 8;
    u32::try_from(scaled).unwrap_or(u32::MAX)
}

/// The fixed instructional header shared by both report paths. `source`
/// names the analyzed data ("Youtubeのデータ" or "グーグルマップのレビュー")
/// and `min_chars` is the required minimum output length, which scales with
/// the number of input items.
#[must_use]
pub fn strategy_header(source: &str, min_chars: usize) -> String {
    format!(
        "あなたは観光戦略の専門家です。\n\
         以下の{source}を分析し、その地域の観光資源を最大限に活用できる\n\
         プロモーション戦略を提案してください。\n\
         出力はMarkdownを絶対に使用せず、通常の日本語の文章スタイルで書いてください。\n\
         必ず{min_chars}文字以上で中途半端に打ち切らず、最後まで書き切ってください。\n\
         \n\
         出力には必ず以下の観点を含めてください：\n\
         \n\
         1. 観光コンテンツのトレンド分析\n\
         - レビューから読み取れる観光体験や人気要素\n\
         - 季節ごとの魅力やイベント傾向\n\
         - 訪問者が特に感動したり不満を持ったりした特徴的なポイント\n\
         \n\
         2. ターゲット分析\n\
         - 国内観光客とインバウンド観光客の関心の違い\n\
         - 年齢層・旅行スタイル（カップル、ファミリー、シニア、学生）による嗜好の傾向\n\
         - 訪問者が重視している価値観（写真映え、非日常感、学び、リラックスなど）\n\
         \n\
         3. プロモーション戦略\n\
         - 季節別・ターゲット層別に効果的な施策\n\
         - レビューで好評だった体験や魅力を活かしたキャンペーン企画\n\
         - 不満点や課題を解消する改善提案（混雑対策、アクセス、設備など）\n\
         \n"
    )
}

/// Prompt for the per-caption summarization pass.
#[must_use]
pub fn caption_summary_prompt(title: &str, caption: &str) -> String {
    format!(
        "動画『{title}』の字幕から観光に関連する内容を日本語でまとめてください。\n\
         観光体験の手順や訪問者の行動・感想をまとめてください。\n\
         特に観光体験・季節イベント、観光客のタイプ、反応、食事・アクセスに注目してください。\n\
         注意: 情報が存在しない項目は省略し、不要な雑談や効果音は書かないでください。\n\
         字幕：\n\
         {caption}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aggregate_budget_scales_with_item_count() {
        assert_eq!(aggregate_token_budget(0), 3_000);
        assert_eq!(aggregate_token_budget(20), 19_000);
    }

    #[test]
    fn aggregate_budget_is_capped() {
        assert_eq!(aggregate_token_budget(100), 32_000);
    }

    #[test]
    fn summary_budget_scales_with_caption_length() {
        assert_eq!(summary_token_budget(0), 1_200);
        assert_eq!(summary_token_budget(8_000), 2_200);
    }

    #[test]
    fn header_embeds_source_and_minimum_length() {
        let header = strategy_header("Youtubeのデータ", 5_000);
        assert!(header.contains("Youtubeのデータ"));
        assert!(header.contains("必ず5000文字以上"));
        assert!(header.contains("プロモーション戦略"));
    }
}
