//! Wires the built-in Facebook provider to an in-memory store, then replays the callbacks a web
//! framework would forward: a connect for a signed-in user and a later login with the same
//! Facebook identity.

// std
use std::sync::Arc;
// crates.io
use color_eyre::{Result, eyre::eyre};
use parking_lot::RwLock;
use serde_json::json;
// self
use oauth2_social::{
	api::RestApi,
	auth::UserId,
	config::AppConfig,
	handler::{Notifier, Session, Severity},
	oauth::OAuthResponse,
	social::SocialBuilder,
	store::MemoryStore,
	url::Url,
};

#[derive(Debug, Default)]
struct DemoSession(RwLock<Option<UserId>>);
impl Session for DemoSession {
	fn current_user(&self) -> Option<UserId> {
		self.0.read().clone()
	}

	fn log_in(&self, user_id: &UserId) -> bool {
		*self.0.write() = Some(user_id.clone());

		true
	}

	fn pop(&self, _key: &str) -> Option<String> {
		None
	}
}

struct PrintNotifier;
impl Notifier for PrintNotifier {
	fn notify(&self, message: &str, severity: Severity) {
		println!("[{}] {message}", severity.as_str());
	}
}

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let store = Arc::new(MemoryStore::default());
	let session = Arc::new(DemoSession::default());
	let mut app = AppConfig::from_iter([(
		"SOCIAL_FACEBOOK",
		json!({ "oauth": { "consumer_key": "demo-app", "consumer_secret": "demo-secret" } }),
	)]);
	let social = SocialBuilder::new(store.clone(), session.clone())
		.with_notifier(Arc::new(PrintNotifier))
		.init(&mut app)?;
	let facebook =
		social.provider("facebook").ok_or_else(|| eyre!("Facebook is not registered."))?;
	let authorization =
		facebook.authorize(&Url::parse("https://app.example.com/social/facebook/connect")?)?;

	println!("{facebook}: send the user to {}", authorization.url);

	session.log_in(&UserId::new("42")?);

	let callback = OAuthResponse::try_from(json!({
		"access_token": "demo-access",
		"user_id": "1000001",
		"name": "Jane Doe",
		"link": "https://www.facebook.com/jane",
	}))
	.map_err(|value| eyre!("Callback payload must be an object, got {value}."))?;
	let redirect = facebook.connect(Some(callback.clone()), None).await?;

	println!("connect -> {redirect} ({} stored)", store.len());

	*session.0.write() = None;

	let redirect = facebook.login(Some(callback)).await?;

	println!("login -> {redirect} as {:?}", session.current_user());

	if let Some(resolved) = facebook.get_connection(None, None).await? {
		let api = resolved.api::<RestApi>();

		println!(
			"primary connection: {:?}, profile endpoint {:?}",
			resolved.connection.display_name,
			api.map(|api| api.endpoint("me")).transpose()?.map(|url| url.to_string()),
		);
	}

	Ok(())
}
