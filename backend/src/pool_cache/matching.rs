use corelib::PoolMetrics;

fn canon(v: &str) -> String {
    v.trim().to_uppercase()
}

/// Tokens a pool answers to: each identifier in full and its bare code
/// (`CODE.ISSUER` → `CODE`), plus the token code and name.
fn pool_tokens(pool: &PoolMetrics) -> Vec<String> {
    let mut tokens = Vec::with_capacity(6);

    for mint in [&pool.mint_a, &pool.mint_b] {
        let full = canon(mint);
        if let Some((code, _issuer)) = full.split_once('.') {
            tokens.push(code.to_string());
        }
        tokens.push(full);
    }

    tokens.extend(pool.token_code.as_deref().map(canon));
    tokens.extend(pool.token_name.as_deref().map(canon));

    tokens.retain(|t| !t.is_empty());
    tokens
}

/// Case-insensitive: both query tokens must be among the pool's tokens.
pub fn matches_tokens(pool: &PoolMetrics, token_a: &str, token_b: &str) -> bool {
    let tokens = pool_tokens(pool);
    let has = |q: &str| {
        let q = canon(q);
        !q.is_empty() && tokens.iter().any(|t| *t == q)
    };
    has(token_a) && has(token_b)
}
