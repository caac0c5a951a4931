//! Localized strings
//!
//! A small fixed catalog. Unknown languages fall back to English.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Locale {
	#[default]
	#[serde(rename = "en")]
	En,
	#[serde(rename = "de")]
	De,
	#[serde(rename = "hu")]
	Hu,
}

/// Catalog entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Text {
	DefaultShieldMessage,
	LoginLink,
	SettingsTitle,
	SectionIntro,
	EnableShield,
	EnableShieldHint,
	ShieldedTypes,
	ShieldedTypesHint,
	ShieldMessage,
	ShieldMessageHint,
	RedirectToLogin,
	RedirectToLoginHint,
	SaveChanges,
	SettingsSaved,
}

impl Locale {
	/// Parse a language tag ("de", "de-AT", "hu_HU.UTF-8", ...)
	pub fn parse(tag: &str) -> Locale {
		let lang = tag.trim().split(['-', '_', '.']).next().unwrap_or_default();
		match lang.to_ascii_lowercase().as_str() {
			"de" => Locale::De,
			"hu" => Locale::Hu,
			_ => Locale::En,
		}
	}

	pub fn code(self) -> &'static str {
		match self {
			Locale::En => "en",
			Locale::De => "de",
			Locale::Hu => "hu",
		}
	}

	pub fn text(self, text: Text) -> &'static str {
		match self {
			Locale::En => en(text),
			Locale::De => de(text),
			Locale::Hu => hu(text),
		}
	}

	/// The message shown to blocked visitors when none is configured
	pub fn default_shield_message(self) -> &'static str {
		self.text(Text::DefaultShieldMessage)
	}
}

fn en(text: Text) -> &'static str {
	match text {
		Text::DefaultShieldMessage => "This content is shielded. Please log in to view.",
		Text::LoginLink => "Login here",
		Text::SettingsTitle => "Shield Settings",
		Text::SectionIntro => {
			"Configure the shield to protect your content from visitors who are not logged in."
		}
		Text::EnableShield => "Enable Shield",
		Text::EnableShieldHint => "Activate the content shield.",
		Text::ShieldedTypes => "Shielded Content Types",
		Text::ShieldedTypesHint => {
			"Select which content types should be shielded from visitors who are not logged in."
		}
		Text::ShieldMessage => "Shield Message",
		Text::ShieldMessageHint => {
			"This message is displayed to visitors who are not logged in, unless redirect is enabled."
		}
		Text::RedirectToLogin => "Redirect to Login",
		Text::RedirectToLoginHint => {
			"Redirect visitors who are not logged in to the login page instead of displaying a message."
		}
		Text::SaveChanges => "Save Changes",
		Text::SettingsSaved => "Settings saved.",
	}
}

fn de(text: Text) -> &'static str {
	match text {
		Text::DefaultShieldMessage => {
			"Dieser Inhalt ist geschützt. Bitte melden Sie sich an, um ihn anzusehen."
		}
		Text::LoginLink => "Hier anmelden",
		Text::SettingsTitle => "Schutzeinstellungen",
		Text::SectionIntro => "Schützen Sie Ihre Inhalte vor nicht angemeldeten Besuchern.",
		Text::EnableShield => "Schutz aktivieren",
		Text::EnableShieldHint => "Den Inhaltsschutz einschalten.",
		Text::ShieldedTypes => "Geschützte Inhaltstypen",
		Text::ShieldedTypesHint => "Wählen Sie die Inhaltstypen, die geschützt werden sollen.",
		Text::ShieldMessage => "Schutzhinweis",
		Text::ShieldMessageHint => {
			"Dieser Hinweis wird nicht angemeldeten Besuchern angezeigt, sofern keine Weiterleitung aktiv ist."
		}
		Text::RedirectToLogin => "Zur Anmeldung weiterleiten",
		Text::RedirectToLoginHint => {
			"Nicht angemeldete Besucher zur Anmeldeseite weiterleiten, statt einen Hinweis anzuzeigen."
		}
		Text::SaveChanges => "Änderungen speichern",
		Text::SettingsSaved => "Einstellungen gespeichert.",
	}
}

fn hu(text: Text) -> &'static str {
	match text {
		Text::DefaultShieldMessage => {
			"Ez a tartalom védett. A megtekintéséhez kérjük, jelentkezzen be."
		}
		Text::LoginLink => "Bejelentkezés",
		Text::SettingsTitle => "Védelmi beállítások",
		Text::SectionIntro => "Védje tartalmait a be nem jelentkezett látogatóktól.",
		Text::EnableShield => "Védelem bekapcsolása",
		Text::EnableShieldHint => "A tartalomvédelem aktiválása.",
		Text::ShieldedTypes => "Védett tartalomtípusok",
		Text::ShieldedTypesHint => "Válassza ki, mely tartalomtípusok legyenek védettek.",
		Text::ShieldMessage => "Védelmi üzenet",
		Text::ShieldMessageHint => {
			"Ezt az üzenetet látják a be nem jelentkezett látogatók, ha nincs átirányítás."
		}
		Text::RedirectToLogin => "Átirányítás a bejelentkezéshez",
		Text::RedirectToLoginHint => {
			"A be nem jelentkezett látogatók átirányítása a bejelentkezési oldalra üzenet helyett."
		}
		Text::SaveChanges => "Mentés",
		Text::SettingsSaved => "Beállítások elmentve.",
	}
}


// vim: ts=4
