/// Stochastic grammar runtime — pool-key resolution and recursive expansion.

use indexmap::IndexMap;
use rand::rngs::StdRng;

use crate::core::shuffle::ShuffleBag;
use crate::schema::config::GeneratorConfig;

/// Expansion depth at which a branch is cut off and contributes nothing.
pub const MAX_DEPTH: usize = 16;

/// Upper bound on placeholder rewrites within one drawn template. Brace
/// fragments returned by child expansions can splice into new placeholders.
const MAX_REWRITES: usize = 4096;

/// A `{name}` token found in a template string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placeholder<'a> {
    /// Byte offset of the opening brace.
    pub offset: usize,
    /// The identifier between the braces.
    pub name: &'a str,
}

impl Placeholder<'_> {
    /// Byte length of the whole token, braces included.
    pub fn len(&self) -> usize {
        self.name.len() + 2
    }
}

/// List every `{name}` token in `input`, left to right.
///
/// A `{` that is followed by another `{` before any `}` starts over at the
/// inner brace, so `{{a}}` yields `a`. Empty braces are not placeholders.
pub fn scan_placeholders(input: &str) -> Vec<Placeholder<'_>> {
    let mut found = Vec::new();
    let mut open: Option<usize> = None;

    for (i, c) in input.char_indices() {
        match c {
            '{' => open = Some(i),
            '}' => {
                if let Some(start) = open.take() {
                    if i > start + 1 {
                        found.push(Placeholder {
                            offset: start,
                            name: &input[start + 1..i],
                        });
                    }
                }
            }
            _ => {}
        }
    }

    found
}

/// Template pools keyed by non-terminal name, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct Grammar {
    pools: IndexMap<String, Vec<String>>,
    /// `(key, "{key}")` for each pool, same order as `pools`.
    tokens: Vec<(String, String)>,
}

impl Grammar {
    pub fn new(pools: IndexMap<String, Vec<String>>) -> Self {
        let tokens = pools
            .keys()
            .map(|k| (k.clone(), format!("{{{}}}", k)))
            .collect();
        Self { pools, tokens }
    }

    pub fn from_config(config: &GeneratorConfig) -> Self {
        Self::new(config.templates.clone())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.pools.contains_key(key)
    }

    pub fn pool(&self, key: &str) -> Option<&[String]> {
        self.pools.get(key).map(Vec::as_slice)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.pools.keys().map(String::as_str)
    }

    /// Expand `key` into text, drawing one template and resolving every
    /// placeholder that names a pool.
    ///
    /// Branches at or beyond [`MAX_DEPTH`] expand to the empty string, which
    /// is what keeps self-referencing pools finite. Placeholders that name no
    /// pool are left in place for variable substitution.
    pub fn expand(&self, key: &str, depth: usize, bag: &mut ShuffleBag, rng: &mut StdRng) -> String {
        if depth >= MAX_DEPTH {
            return String::new();
        }

        let Some(pool) = self.pools.get(key) else {
            return String::new();
        };
        let Some(template) = bag.next(key, pool, rng) else {
            return String::new();
        };

        let mut text = template.to_string();
        for _ in 0..MAX_REWRITES {
            let Some((offset, child, token)) = self.leftmost_pool_ref(&text) else {
                break;
            };
            let expansion = self.expand(child, depth + 1, bag, rng);
            text.replace_range(offset..offset + token.len(), &expansion);
        }

        text
    }

    /// Offset, pool key and token of the leftmost placeholder naming a pool.
    ///
    /// Pools are tried in declaration order; an earlier pool only wins a tie,
    /// which two distinct tokens can never produce.
    fn leftmost_pool_ref(&self, text: &str) -> Option<(usize, &str, &str)> {
        let mut best: Option<(usize, &str, &str)> = None;
        for (key, token) in &self.tokens {
            if let Some(offset) = text.find(token.as_str()) {
                if best.map_or(true, |(b, _, _)| offset < b) {
                    best = Some((offset, key.as_str(), token.as_str()));
                }
            }
        }
        best
    }

    /// Pool names referenced anywhere in `key`'s templates, deduplicated,
    /// in order of first appearance.
    pub fn references(&self, key: &str) -> Vec<&str> {
        let mut refs: Vec<&str> = Vec::new();
        for template in self.pools.get(key).into_iter().flatten() {
            for ph in scan_placeholders(template) {
                if let Some((name, _)) = self.pools.get_key_value(ph.name) {
                    if !refs.contains(&name.as_str()) {
                        refs.push(name.as_str());
                    }
                }
            }
        }
        refs
    }
}
