//! User-role prompt builders for the analysis pipeline
//!
//! The tool speaks Korean to its users, so the prompts ask for Korean
//! output. Each builder produces the single user-role message of one
//! streaming completion call.

/// Prompt asking for a prose summary of recent price observations
pub fn price_summary_prompt(ticker: &str, period_days: u32, price_table: &str) -> String {
    format!(
        "다음은 {ticker} 주식의 최근 {period_days}일 주가 데이터입니다. \
         이 데이터를 바탕으로 주가 동향을 요약해 주세요:\n\n{price_table}\n\n요약:"
    )
}

/// Prompt combining the completed price summary and the news block into a
/// strategy request. The summary must be the fully accumulated text of the
/// previous call, never a partial stream.
pub fn investment_strategy_prompt(ticker: &str, price_summary: &str, news_block: &str) -> String {
    format!(
        "다음은 {ticker} 주식에 대한 최근 뉴스 및 주가 데이터 요약입니다.\n\
         이를 기반으로 미래에 대한 AI투자 전략을 작성해 주세요.\n\n\
         [주가 데이터 요약]\n{price_summary}\n\n\
         [뉴스 정보]\n{news_block}\n\n\
         투자 전략:"
    )
}

/// Prompt mapping a free-text company name to a ticker symbol.
///
/// Instructs the model to translate non-English names before lookup, to
/// answer with the literal sentinel "not found" when there is no match, and
/// to reply with exactly one token.
pub fn ticker_lookup_prompt(company_name: &str) -> String {
    format!(
        "\"{company_name}\"라는 회사 이름에 대해 적절한 주식 티커를 반환해 주세요.\n\
         입력된 이름이 영어가 아니라면, 이를 영어로 번역한 후 검색하고 티커를 반환해 주세요.\n\
         관련 정보가 없을 경우, \"not found\"라고 답변해 주세요.\n\
         반환 값은 반드시 한 단어로 출력해 주세요."
    )
}
