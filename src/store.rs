//! In-process slot holding the single current token of a client instance.
//!
//! The slot stores an immutable [`Token`] behind an [`Arc`] and swaps the whole snapshot on every
//! replacement, so readers never observe a half-updated token. Each replacement bumps a
//! generation counter that lets the executor tell whether somebody else already refreshed the
//! token it saw rejected.

// self
use crate::{_prelude::*, auth::Token};

/// Immutable view of the held token at one point in time.
#[derive(Clone, Debug)]
pub struct TokenSnapshot {
	/// Token held when the snapshot was taken.
	pub token: Arc<Token>,
	/// Replacement counter; `0` means no token was ever issued.
	pub generation: u64,
	/// Instant the token was stored, if one was ever issued.
	pub obtained_at: Option<OffsetDateTime>,
}
impl TokenSnapshot {
	fn empty() -> Self {
		Self { token: Arc::new(Token::default()), generation: 0, obtained_at: None }
	}

	/// Returns the best-effort expiry instant derived from `obtained_at + expires_in`.
	pub fn expires_at(&self) -> Option<OffsetDateTime> {
		let obtained_at = self.obtained_at?;
		let lifetime = self.token.expires_in_duration()?;

		obtained_at.checked_add(lifetime)
	}
}

/// Thread-safe holder of the current token for one client instance.
#[derive(Debug)]
pub struct TokenSlot(RwLock<TokenSnapshot>);
impl TokenSlot {
	/// Returns the current snapshot.
	pub fn snapshot(&self) -> TokenSnapshot {
		self.0.read().clone()
	}

	/// Returns the generation of the current snapshot.
	pub fn generation(&self) -> u64 {
		self.0.read().generation
	}

	/// Replaces the held token and returns the snapshot that now holds it.
	pub fn replace(&self, token: Token) -> TokenSnapshot {
		let mut guard = self.0.write();
		let next = TokenSnapshot {
			token: Arc::new(token),
			generation: guard.generation.wrapping_add(1),
			obtained_at: Some(OffsetDateTime::now_utc()),
		};

		*guard = next.clone();

		next
	}
}
impl Default for TokenSlot {
	fn default() -> Self {
		Self(RwLock::new(TokenSnapshot::empty()))
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn slot_starts_empty() {
		let slot = TokenSlot::default();
		let snapshot = slot.snapshot();

		assert!(snapshot.token.is_empty());
		assert_eq!(snapshot.generation, 0);
		assert!(snapshot.obtained_at.is_none());
		assert!(snapshot.expires_at().is_none());
	}

	#[test]
	fn replace_keeps_last_write_and_bumps_generation() {
		let slot = TokenSlot::default();
		let first = slot.replace(Token::with_access_token("first"));
		let second = slot.replace(Token::with_access_token("second"));

		assert_eq!(first.generation, 1);
		assert_eq!(second.generation, 2);
		assert_eq!(slot.generation(), 2);
		assert_eq!(slot.snapshot().token.access_token.expose(), "second");
		// Earlier snapshots stay intact after a swap.
		assert_eq!(first.token.access_token.expose(), "first");
	}

	#[test]
	fn expires_at_uses_lifetime_hint() {
		let slot = TokenSlot::default();
		let token = Token { expires_in: "120".into(), ..Token::with_access_token("t") };
		let snapshot = slot.replace(token);
		let obtained_at =
			snapshot.obtained_at.expect("Replaced snapshot should record the obtained instant.");

		assert_eq!(snapshot.expires_at(), Some(obtained_at + Duration::minutes(2)));
	}
}
