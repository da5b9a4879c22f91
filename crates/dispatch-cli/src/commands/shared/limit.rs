/// Compute effective limit with precedence: global flag -> fallback.
#[must_use]
pub fn effective_limit(global: Option<u32>, fallback: u32) -> u32 {
    global.unwrap_or(fallback)
}

#[cfg(test)]
mod tests {
    use super::effective_limit;

    #[test]
    fn global_used_when_set() {
        assert_eq!(effective_limit(Some(10), 20), 10);
    }

    #[test]
    fn fallback_used_when_none_set() {
        assert_eq!(effective_limit(None, 20), 20);
    }
}
