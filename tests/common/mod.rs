#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use futures::{FutureExt, future::BoxFuture};
use uuid::Uuid;
use wish_pixels::{
    Collaborators, WishBoard,
    config::Config,
    error::{AppError, Result, ServiceError, ServiceResult},
    infrastructure::{
        InjectedEthereum, InjectedSolana, KeyValueStore, WalletHost,
        identity::IdentityService,
        pixels::PixelService,
        storage::MemoryStore,
    },
    services::{
        pixel_map::types::{PixelSnapshot, PixelStats},
        session::types::{AuthGrant, UserRecord},
        wish::WishPayload,
    },
};

pub const PHANTOM_KEY: [u8; 32] = [7; 32];
pub const BACKPACK_KEY: [u8; 32] = [9; 32];
pub const EVM_ADDRESS: &str = "0xdeadbeef";

pub fn solana_address(key: [u8; 32]) -> String {
    bs58::encode(key).into_string()
}

pub struct FakeSolana {
    phantom: bool,
    public_key: [u8; 32],
    reject: Option<String>,
    connected: Mutex<bool>,
    pub connect_calls: AtomicUsize,
}

impl FakeSolana {
    pub fn phantom() -> Arc<Self> {
        Arc::new(Self::new(true, PHANTOM_KEY, None))
    }

    pub fn backpack() -> Arc<Self> {
        Arc::new(Self::new(false, BACKPACK_KEY, None))
    }

    pub fn rejecting(phantom: bool) -> Arc<Self> {
        Arc::new(Self::new(phantom, PHANTOM_KEY, Some("User rejected the request")))
    }

    fn new(phantom: bool, public_key: [u8; 32], reject: Option<&str>) -> Self {
        Self {
            phantom,
            public_key,
            reject: reject.map(str::to_string),
            connected: Mutex::new(false),
            connect_calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.connect_calls.load(Ordering::SeqCst)
    }
}

impl InjectedSolana for FakeSolana {
    fn is_phantom(&self) -> bool {
        self.phantom
    }

    fn connect(&self) -> BoxFuture<'_, ServiceResult<()>> {
        self.connect_calls.fetch_add(1, Ordering::SeqCst);
        async move {
            if let Some(reason) = &self.reject {
                return Err(ServiceError::new(reason.clone()));
            }
            *self.connected.lock().unwrap() = true;
            Ok(())
        }
        .boxed()
    }

    fn public_key(&self) -> Option<[u8; 32]> {
        let connected = *self.connected.lock().unwrap();
        connected.then_some(self.public_key)
    }
}

pub struct FakeEthereum {
    accounts: ServiceResult<Vec<String>>,
    pub request_calls: AtomicUsize,
}

impl FakeEthereum {
    pub fn with_accounts(accounts: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            accounts: Ok(accounts.iter().map(|account| account.to_string()).collect()),
            request_calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.request_calls.load(Ordering::SeqCst)
    }
}

impl InjectedEthereum for FakeEthereum {
    fn request_accounts(&self) -> BoxFuture<'_, ServiceResult<Vec<String>>> {
        self.request_calls.fetch_add(1, Ordering::SeqCst);
        let accounts = self.accounts.clone();
        async move { accounts }.boxed()
    }
}

/// Extensions can be installed or removed while a test runs.
#[derive(Default)]
pub struct FakeHost {
    pub solana: Mutex<Option<Arc<FakeSolana>>>,
    pub backpack: Mutex<Option<Arc<FakeSolana>>>,
    pub ethereum: Mutex<Option<Arc<FakeEthereum>>>,
}

impl FakeHost {
    pub fn new(
        solana: Option<Arc<FakeSolana>>,
        backpack: Option<Arc<FakeSolana>>,
        ethereum: Option<Arc<FakeEthereum>>,
    ) -> Arc<Self> {
        Arc::new(Self {
            solana: Mutex::new(solana),
            backpack: Mutex::new(backpack),
            ethereum: Mutex::new(ethereum),
        })
    }
}

impl WalletHost for FakeHost {
    fn solana(&self) -> Option<Arc<dyn InjectedSolana>> {
        let solana = self.solana.lock().unwrap().clone()?;
        Some(solana)
    }

    fn backpack_solana(&self) -> Option<Arc<dyn InjectedSolana>> {
        let backpack = self.backpack.lock().unwrap().clone()?;
        Some(backpack)
    }

    fn ethereum(&self) -> Option<Arc<dyn InjectedEthereum>> {
        let ethereum = self.ethereum.lock().unwrap().clone()?;
        Some(ethereum)
    }
}

#[derive(Default)]
pub struct FakeIdentity {
    accounts: Mutex<HashMap<String, (String, UserRecord)>>,
    sessions: Mutex<HashMap<String, UserRecord>>,
    pub login_calls: AtomicUsize,
    pub register_calls: AtomicUsize,
    pub who_am_i_calls: AtomicUsize,
}

impl FakeIdentity {
    pub fn with_account(email: &str, password: &str) -> Arc<Self> {
        let identity = Self::default();
        identity.add_account(email, password);
        Arc::new(identity)
    }

    pub fn add_account(&self, email: &str, password: &str) -> UserRecord {
        let user = UserRecord {
            id: Uuid::new_v4(),
            email: email.to_string(),
            created_at: None,
        };
        self.accounts
            .lock()
            .unwrap()
            .insert(email.to_string(), (password.to_string(), user.clone()));
        user
    }

    /// Makes `token` valid for `email` as if issued by an earlier login.
    pub fn issue(&self, token: &str, email: &str) {
        let user = self.accounts.lock().unwrap()[email].1.clone();
        self.sessions.lock().unwrap().insert(token.to_string(), user);
    }

    pub fn revoke(&self, token: &str) {
        self.sessions.lock().unwrap().remove(token);
    }

    pub fn who_am_i_count(&self) -> usize {
        self.who_am_i_calls.load(Ordering::SeqCst)
    }
}

impl IdentityService for FakeIdentity {
    fn login<'a>(
        &'a self,
        email: &'a str,
        password: &'a str,
    ) -> BoxFuture<'a, ServiceResult<AuthGrant>> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);
        async move {
            let user = match self.accounts.lock().unwrap().get(email) {
                Some((expected, user)) if expected == password => user.clone(),
                _ => return Err(ServiceError::new("Invalid credentials")),
            };
            let token = format!("token-{}", Uuid::new_v4());
            self.sessions
                .lock()
                .unwrap()
                .insert(token.clone(), user.clone());
            Ok(AuthGrant { token, user })
        }
        .boxed()
    }

    fn register<'a>(
        &'a self,
        email: &'a str,
        password: &'a str,
    ) -> BoxFuture<'a, ServiceResult<()>> {
        self.register_calls.fetch_add(1, Ordering::SeqCst);
        async move {
            if self.accounts.lock().unwrap().contains_key(email) {
                return Err(ServiceError::new("Email already registered"));
            }
            self.add_account(email, password);
            Ok(())
        }
        .boxed()
    }

    fn who_am_i<'a>(&'a self, token: &'a str) -> BoxFuture<'a, ServiceResult<UserRecord>> {
        self.who_am_i_calls.fetch_add(1, Ordering::SeqCst);
        async move {
            self.sessions
                .lock()
                .unwrap()
                .get(token)
                .cloned()
                .ok_or_else(|| ServiceError::new("Invalid token"))
        }
        .boxed()
    }
}

#[derive(Default)]
pub struct FakePixels {
    pixels: Mutex<Vec<PixelSnapshot>>,
    reject_submit: Mutex<Option<String>>,
    pub fail_stats: bool,
    pub submit_calls: AtomicUsize,
}

impl FakePixels {
    pub fn with_pixels(pixels: Vec<PixelSnapshot>) -> Arc<Self> {
        Arc::new(Self {
            pixels: Mutex::new(pixels),
            ..Self::default()
        })
    }

    pub fn without_stats(pixels: Vec<PixelSnapshot>) -> Arc<Self> {
        Arc::new(Self {
            pixels: Mutex::new(pixels),
            fail_stats: true,
            ..Self::default()
        })
    }

    pub fn reject_next_submit(&self, reason: &str) {
        *self.reject_submit.lock().unwrap() = Some(reason.to_string());
    }

    pub fn submits(&self) -> usize {
        self.submit_calls.load(Ordering::SeqCst)
    }
}

impl PixelService for FakePixels {
    fn list_pixels(&self) -> BoxFuture<'_, ServiceResult<Vec<PixelSnapshot>>> {
        let pixels = self.pixels.lock().unwrap().clone();
        async move { Ok(pixels) }.boxed()
    }

    fn stats(&self) -> BoxFuture<'_, ServiceResult<PixelStats>> {
        async move {
            if self.fail_stats {
                return Err(ServiceError::new("stats offline"));
            }
            let pixels = self.pixels.lock().unwrap();
            let total = pixels.len() as u32;
            let claimed = pixels.iter().filter(|pixel| pixel.has_wish).count() as u32;
            Ok(PixelStats {
                total_pixels: total,
                pixels_with_wishes: claimed,
                available_pixels: total - claimed,
                wish_percentage: if total == 0 {
                    0.0
                } else {
                    f64::from(claimed) * 100.0 / f64::from(total)
                },
            })
        }
        .boxed()
    }

    fn submit_wish<'a>(
        &'a self,
        pixel_id: u32,
        payload: &'a WishPayload,
    ) -> BoxFuture<'a, ServiceResult<PixelSnapshot>> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        async move {
            if let Some(reason) = self.reject_submit.lock().unwrap().take() {
                return Err(ServiceError::new(reason));
            }

            let mut pixels = self.pixels.lock().unwrap();
            let pixel = pixels
                .iter_mut()
                .find(|pixel| pixel.pixel_id == pixel_id)
                .ok_or_else(|| ServiceError::new("Pixel not found"))?;

            if pixel.has_wish {
                return Err(ServiceError::new("Pixel already has a wish"));
            }

            pixel.has_wish = true;
            pixel.color = payload.color.clone();
            pixel.wish_text = Some(payload.wish_text.clone());
            pixel.wallet_address = Some(payload.wallet_address.clone());
            pixel.image_url = payload.image.as_ref().map(|image| image.0.clone());
            Ok(pixel.clone())
        }
        .boxed()
    }
}

/// Memory storage that can be told to fail writes to one key.
#[derive(Default)]
pub struct FlakyStore {
    inner: MemoryStore,
    failing_key: Mutex<Option<String>>,
}

impl FlakyStore {
    pub fn fail_writes_to(&self, key: &str) {
        *self.failing_key.lock().unwrap() = Some(key.to_string());
    }

    pub fn heal(&self) {
        *self.failing_key.lock().unwrap() = None;
    }

    fn check(&self, key: &str) -> Result<()> {
        match self.failing_key.lock().unwrap().as_deref() {
            Some(failing) if failing == key => {
                Err(AppError::Storage(format!("write to {key} failed")))
            }
            _ => Ok(()),
        }
    }
}

impl KeyValueStore for FlakyStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.check(key)?;
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.check(key)?;
        self.inner.remove(key)
    }
}

pub fn claimed(pixel_id: u32, text: &str) -> PixelSnapshot {
    PixelSnapshot {
        pixel_id,
        has_wish: true,
        color: "#ff6b6b".into(),
        wish_text: Some(text.into()),
        wallet_address: Some(EVM_ADDRESS.into()),
        image_url: None,
    }
}

pub fn free(pixel_id: u32) -> PixelSnapshot {
    PixelSnapshot::unclaimed(pixel_id, "#ffffff")
}

pub struct Harness {
    pub board: WishBoard,
    pub host: Arc<FakeHost>,
    pub identity: Arc<FakeIdentity>,
    pub pixels: Arc<FakePixels>,
    pub storage: Arc<FlakyStore>,
}

impl Harness {
    pub fn new(
        host: Arc<FakeHost>,
        identity: Arc<FakeIdentity>,
        pixels: Arc<FakePixels>,
    ) -> Self {
        Self::with_storage(host, identity, pixels, Arc::new(FlakyStore::default()))
    }

    pub fn with_storage(
        host: Arc<FakeHost>,
        identity: Arc<FakeIdentity>,
        pixels: Arc<FakePixels>,
        storage: Arc<FlakyStore>,
    ) -> Self {
        Self::with_config(Config::default(), host, identity, pixels, storage).unwrap()
    }

    pub fn with_config(
        config: Config,
        host: Arc<FakeHost>,
        identity: Arc<FakeIdentity>,
        pixels: Arc<FakePixels>,
        storage: Arc<FlakyStore>,
    ) -> Result<Self> {
        let collaborators = Collaborators {
            identity: identity.clone(),
            pixels: pixels.clone(),
            storage: storage.clone(),
            host: host.clone(),
        };

        Ok(Self {
            board: WishBoard::new(config, collaborators)?,
            host,
            identity,
            pixels,
            storage,
        })
    }

    /// Board with every extension installed, one account and a small grid.
    pub async fn standard() -> Self {
        let host = FakeHost::new(
            Some(FakeSolana::phantom()),
            Some(FakeSolana::backpack()),
            Some(FakeEthereum::with_accounts(&[EVM_ADDRESS])),
        );
        let identity = FakeIdentity::with_account("alice@example.com", "hunter22");
        let pixels = FakePixels::with_pixels(vec![free(1), claimed(2, "a bike"), free(42)]);

        let mut harness = Self::new(host, identity, pixels);
        harness.board.refresh_pixels().await.unwrap();
        harness
    }

    /// Runs a login from the current login prompt through to completion.
    pub async fn login(&mut self) -> Result<bool> {
        let pending = self.board.begin_login("alice@example.com", "hunter22")?;
        let completed = pending.wait().await;
        self.board.apply_login(completed)
    }

    /// Header login button, then login.
    pub async fn login_from_header(&mut self) {
        self.board.open_login().unwrap();
        self.login().await.unwrap();
    }
}
