use crate::models::package::CreditPackage;

pub const CSRF_TOKEN_COOKIE_NAME: &str = "csrf_token";
pub const FLASH_ALERT_COOKIE_NAME: &str = "flash_alert";
pub const SESSION_COOKIE_NAME: &str = "credit-shop-session";

// Selection keys, kept identical to the names the pages always used
pub const SELECTED_CREDIT_KEY: &str = "selectedCredit";
pub const SELECTED_PRICE_KEY: &str = "selectedPrice";
pub const PRODUCT_NAME_KEY: &str = "productName";

pub const CREDIT_SHOP_PAGE_PATH: &str = "/credit-shop.html";
pub const PAYMENT_PAGE_PATH: &str = "/payment.html";
pub const GAME_SERVER_CREDIT_API_PATH: &str = "/api/payment/credit";

pub const CREDIT_PACKAGES: [CreditPackage; 4] = [
    CreditPackage::new(100, 1_000, false),
    CreditPackage::new(500, 5_000, true),
    CreditPackage::new(1_000, 10_000, false),
    CreditPackage::new(5_000, 50_000, false),
];

/// Payments below this amount (won) are approved without asking the game server
pub const AUTO_APPROVE_BELOW_AMOUNT: u64 = 300;
/// Balance assumed by the simulated game server before crediting
pub const SIMULATED_BASE_CREDIT_BALANCE: i64 = 1_000;
pub const GAME_SERVER_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(10);

pub const MISSING_SELECTION_ALERT: &str = "구매할 크레딧을 선택해주세요.";
pub const STORAGE_ERROR_ALERT: &str =
    "설정 저장 중 오류가 발생했습니다. 브라우저 설정을 확인해주세요.";
pub const PAYMENT_IN_PROGRESS_ALERT: &str = "결제가 이미 진행 중입니다.";
pub const DEFAULT_PAYMENT_ERROR_MESSAGE: &str = "결제 처리 중 오류가 발생했습니다.";
pub const SMALL_AMOUNT_APPROVED_MESSAGE: &str = "소액 결제 자동 처리 완료";
pub const PAYMENT_APPROVED_MESSAGE: &str = "결제가 성공적으로 처리되었습니다.";

pub const MAX_AGE_COOKIES: i64 = chrono::TimeDelta::hours(4).num_seconds();
