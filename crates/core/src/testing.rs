//! In-memory collaborators and fixtures shared by the unit tests.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tokio::sync::Semaphore;

use crate::errors::{Error, Result};
use crate::goals::{Goal, GoalApiClient, GoalDraft, GoalId, GoalView, NewGoal};
use crate::payments::{PaymentApiClient, PaymentRecord};
use crate::products::{Product, ProductType};
use crate::profile::{
    InvestmentProfile, ProfileAnswer, ProfileApiClient, ProfileQuestion, QuestionOption,
    QuestionnaireResponder,
};
use crate::recommendation::{RecommendationApiClient, RecommendationSnapshot, RecommendedProduct};
use crate::subscription::{
    FundingAccount, FundingAccountApiClient, PinApiClient, SubscriptionApiClient,
    SubscriptionReceipt, SubscriptionRequest,
};

fn rejection(message: &str) -> Error {
    Error::BusinessRejection {
        code: None,
        message: message.to_string(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Gate
// ─────────────────────────────────────────────────────────────────────────────

/// Holds mock calls until released.
#[derive(Clone)]
pub struct Gate(Arc<Semaphore>);

impl Gate {
    fn closed() -> Self {
        Self(Arc::new(Semaphore::new(0)))
    }

    pub fn release(&self) {
        self.0.add_permits(1);
    }

    async fn pass(&self) {
        // The permit is returned on drop so every held call gets through.
        let _permit = self.0.acquire().await;
    }
}

async fn pass_gate(gate: &Mutex<Option<Gate>>) {
    let gate = gate.lock().unwrap().clone();
    if let Some(gate) = gate {
        gate.pass().await;
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Fixtures
// ─────────────────────────────────────────────────────────────────────────────

pub fn profile_expiring(now: NaiveDateTime, days: i64) -> InvestmentProfile {
    InvestmentProfile {
        id: Some(1),
        risk_type: "위험중립형".to_string(),
        risk_level: 3,
        score: 42,
        expired_at: now + Duration::days(days),
    }
}

pub fn draft(title: &str, target_amount: i64, target_period: i32) -> GoalDraft {
    GoalDraft::new(title, "", target_amount, target_period)
}

/// A snapshot for a 1,000,000 KRW monthly plan, one product per ratio. The
/// first product is a savings account, the rest are ETFs.
pub fn snapshot_with_ratios(ratios: &[Decimal]) -> RecommendationSnapshot {
    let monthly_amount = 1_000_000;
    let recommended_products = ratios
        .iter()
        .enumerate()
        .map(|(i, ratio)| {
            let monthly = (*ratio * Decimal::from(monthly_amount) / Decimal::from(100))
                .to_i64()
                .unwrap();
            RecommendedProduct {
                product_id: i as i64 + 1,
                product_name: None,
                product_type: if i == 0 {
                    ProductType::Savings
                } else {
                    ProductType::Etf
                },
                investment_ratio: *ratio,
                investment_amount: monthly * 24,
                monthly_amount: monthly,
                expected_return_rate: Decimal::new(35, 1),
                recommendation_reason: String::new(),
            }
        })
        .collect();

    RecommendationSnapshot {
        monthly_amount,
        total_expected_return: Decimal::new(48, 1),
        achievement_probability: Decimal::new(875, 1),
        total_risk_score: Decimal::new(24, 1),
        risk_assessment: "중위험".to_string(),
        ai_explanation: "안정형 상품 위주로 구성했습니다.".to_string(),
        recommended_products,
    }
}

/// A product; passing a settlement account makes it subscribed.
pub fn product(
    product_id: i64,
    product_type: ProductType,
    monthly_amount: i64,
    account_number: Option<&str>,
) -> Product {
    Product {
        product_id,
        product_name: Some(format!("{} {}", product_type.label(), product_id)),
        product_type,
        investment_ratio: Decimal::ZERO,
        monthly_amount,
        subscribed: account_number.is_some(),
        account_number: account_number.map(str::to_string),
        total_deposit: None,
        profit: None,
        return_rate: None,
        base_rate: None,
        profit_rate: None,
    }
}

/// A 24-month, 50,000,000 KRW goal holding `products`.
pub fn goal_with_products(goal_id: i64, products: Vec<Product>) -> Goal {
    Goal {
        goal_id: GoalId(goal_id),
        goal_name: "신혼집".to_string(),
        detailed_goal: None,
        target_amount: 50_000_000,
        target_period: 24,
        monthly_amount: products.iter().map(|p| p.monthly_amount).sum(),
        status: "ACTIVE".to_string(),
        maturity_date: None,
        achievement_probability: None,
        total_expected_return: None,
        products,
    }
}

pub fn empty_view(goal_id: i64) -> GoalView {
    GoalView::from_goal(
        goal_with_products(goal_id, vec![]),
        vec![],
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap(),
    )
}

pub fn payment_record(
    auto_transfer_id: i64,
    to_account_number: &str,
    next_payment_date: NaiveDate,
    remaining_installments: i32,
) -> PaymentRecord {
    PaymentRecord {
        auto_transfer_id,
        to_account_number: to_account_number.to_string(),
        amount: 600_000,
        next_payment_date,
        remaining_installments,
        payment_status: "ACTIVE".to_string(),
    }
}

pub fn funding_account() -> FundingAccount {
    FundingAccount {
        account_number: "110-01-123456".to_string(),
        account_name: "우리 모임통장".to_string(),
        bank_name: "신한은행".to_string(),
        balance: 3_000_000,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Profile
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct MockProfileApi {
    profile: Mutex<Option<InvestmentProfile>>,
    issued: Mutex<Option<InvestmentProfile>>,
    submission_error: Mutex<Option<String>>,
    last_answers: Mutex<Vec<ProfileAnswer>>,
    get_count: AtomicUsize,
    submit_count: AtomicUsize,
}

impl MockProfileApi {
    pub fn with_profile(profile: InvestmentProfile) -> Self {
        let api = Self::default();
        *api.profile.lock().unwrap() = Some(profile);
        api
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Profile returned by the next questionnaire submission.
    pub fn issue_on_submit(&self, profile: InvestmentProfile) {
        *self.issued.lock().unwrap() = Some(profile);
    }

    pub fn reject_submission(&self, message: &str) {
        *self.submission_error.lock().unwrap() = Some(message.to_string());
    }

    pub fn get_count(&self) -> usize {
        self.get_count.load(Ordering::SeqCst)
    }

    pub fn submit_count(&self) -> usize {
        self.submit_count.load(Ordering::SeqCst)
    }

    pub fn last_answers(&self) -> Vec<ProfileAnswer> {
        self.last_answers.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProfileApiClient for MockProfileApi {
    async fn get_profile(&self) -> Result<Option<InvestmentProfile>> {
        self.get_count.fetch_add(1, Ordering::SeqCst);
        Ok(self.profile.lock().unwrap().clone())
    }

    async fn list_questions(&self) -> Result<Vec<ProfileQuestion>> {
        let options = vec![
            QuestionOption {
                value: "1".to_string(),
                label: "전혀 없음".to_string(),
            },
            QuestionOption {
                value: "2".to_string(),
                label: "1년 이상".to_string(),
            },
        ];
        Ok(vec![
            ProfileQuestion {
                question_id: 1,
                content: "투자 경험이 있나요?".to_string(),
                options: options.clone(),
            },
            ProfileQuestion {
                question_id: 2,
                content: "손실을 감내할 수 있나요?".to_string(),
                options,
            },
        ])
    }

    async fn submit_answers(&self, answers: Vec<ProfileAnswer>) -> Result<InvestmentProfile> {
        self.submit_count.fetch_add(1, Ordering::SeqCst);
        *self.last_answers.lock().unwrap() = answers;

        if let Some(message) = self.submission_error.lock().unwrap().clone() {
            return Err(rejection(&message));
        }
        let issued = self
            .issued
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| rejection("no profile scripted"))?;
        *self.profile.lock().unwrap() = Some(issued.clone());
        Ok(issued)
    }
}

/// Answers every question with the same option.
pub struct ScriptedResponder {
    answer: String,
    skip_last: bool,
}

impl ScriptedResponder {
    pub fn answering(answer: &str) -> Self {
        Self {
            answer: answer.to_string(),
            skip_last: false,
        }
    }

    pub fn skipping_last(answer: &str) -> Self {
        Self {
            answer: answer.to_string(),
            skip_last: true,
        }
    }
}

#[async_trait]
impl QuestionnaireResponder for ScriptedResponder {
    async fn answer(&self, questions: &[ProfileQuestion]) -> Result<Vec<ProfileAnswer>> {
        let take = if self.skip_last {
            questions.len().saturating_sub(1)
        } else {
            questions.len()
        };
        Ok(questions
            .iter()
            .take(take)
            .map(|q| ProfileAnswer {
                question_id: q.question_id,
                answer: self.answer.clone(),
            })
            .collect())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Recommendation
// ─────────────────────────────────────────────────────────────────────────────

pub struct MockRecommendationApi {
    response: std::result::Result<RecommendationSnapshot, String>,
    next_error: Mutex<Option<Error>>,
    calls: AtomicUsize,
}

impl MockRecommendationApi {
    pub fn returning(snapshot: RecommendationSnapshot) -> Self {
        Self {
            response: Ok(snapshot),
            next_error: Mutex::new(None),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn rejecting(message: &str) -> Self {
        Self {
            response: Err(message.to_string()),
            next_error: Mutex::new(None),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn fail_next(&self, err: Error) {
        *self.next_error.lock().unwrap() = Some(err);
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecommendationApiClient for MockRecommendationApi {
    async fn recommend(&self, _draft: &GoalDraft) -> Result<RecommendationSnapshot> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.next_error.lock().unwrap().take() {
            return Err(err);
        }
        self.response.clone().map_err(|message| rejection(&message))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Goals
// ─────────────────────────────────────────────────────────────────────────────

pub struct MockGoalApi {
    goals: Mutex<BTreeMap<GoalId, Goal>>,
    next_id: AtomicI64,
    last_created: Mutex<Option<NewGoal>>,
    create_error: Mutex<Option<String>>,
    create_gate: Mutex<Option<Gate>>,
    creates: AtomicUsize,
    gets: AtomicUsize,
}

impl MockGoalApi {
    pub fn with_next_id(next_id: i64) -> Self {
        Self {
            goals: Mutex::new(BTreeMap::new()),
            next_id: AtomicI64::new(next_id),
            last_created: Mutex::new(None),
            create_error: Mutex::new(None),
            create_gate: Mutex::new(None),
            creates: AtomicUsize::new(0),
            gets: AtomicUsize::new(0),
        }
    }

    pub fn insert(&self, goal: Goal) {
        self.goals.lock().unwrap().insert(goal.goal_id, goal);
    }

    /// Flips a product to subscribed the way the server does.
    pub fn subscribe_product(&self, goal_id: GoalId, product_id: i64, account_number: &str) {
        if let Some(goal) = self.goals.lock().unwrap().get_mut(&goal_id) {
            for product in goal.products.iter_mut().filter(|p| p.product_id == product_id) {
                product.subscribed = true;
                product.account_number = Some(account_number.to_string());
            }
        }
    }

    fn subscribe_anywhere(&self, product_id: i64, account_number: &str) {
        let ids: Vec<GoalId> = self.goals.lock().unwrap().keys().copied().collect();
        for goal_id in ids {
            self.subscribe_product(goal_id, product_id, account_number);
        }
    }

    pub fn hold_creates(&self) -> Gate {
        let gate = Gate::closed();
        *self.create_gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    pub fn fail_next_create(&self, message: &str) {
        *self.create_error.lock().unwrap() = Some(message.to_string());
    }

    pub fn create_count(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }

    pub fn get_count(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    pub fn last_created(&self) -> Option<NewGoal> {
        self.last_created.lock().unwrap().clone()
    }
}

#[async_trait]
impl GoalApiClient for MockGoalApi {
    async fn create_goal(&self, new_goal: NewGoal) -> Result<Goal> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        pass_gate(&self.create_gate).await;
        *self.last_created.lock().unwrap() = Some(new_goal.clone());

        if let Some(message) = self.create_error.lock().unwrap().take() {
            return Err(rejection(&message));
        }

        let goal_id = GoalId(self.next_id.fetch_add(1, Ordering::SeqCst));
        let products = new_goal
            .recommended_products
            .iter()
            .map(|rec| {
                let mut p = product(rec.product_id, rec.product_type, rec.monthly_amount, None);
                p.product_name = rec.product_name.clone();
                p.investment_ratio = rec.investment_ratio;
                p
            })
            .collect();
        let goal = Goal {
            goal_id,
            goal_name: new_goal.goal_title,
            detailed_goal: Some(new_goal.detailed_goal),
            target_amount: new_goal.target_amount,
            target_period: new_goal.target_period,
            monthly_amount: new_goal.monthly_amount,
            status: "ACTIVE".to_string(),
            maturity_date: None,
            achievement_probability: Some(new_goal.achievement_probability),
            total_expected_return: Some(new_goal.total_expected_return),
            products,
        };
        self.insert(goal.clone());
        Ok(goal)
    }

    async fn get_goal(&self, goal_id: GoalId) -> Result<Goal> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.goals
            .lock()
            .unwrap()
            .get(&goal_id)
            .cloned()
            .ok_or(Error::GoalNotFound(goal_id))
    }

    async fn list_goals(&self) -> Result<Vec<Goal>> {
        Ok(self.goals.lock().unwrap().values().cloned().collect())
    }

    async fn delete_goal(&self, goal_id: GoalId) -> Result<()> {
        self.goals
            .lock()
            .unwrap()
            .remove(&goal_id)
            .map(|_| ())
            .ok_or(Error::GoalNotFound(goal_id))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Payments
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct MockPaymentApi {
    records: Mutex<Vec<PaymentRecord>>,
    failures: Mutex<BTreeMap<String, Error>>,
    requested: Mutex<Vec<String>>,
    gate: Mutex<Option<Gate>>,
}

impl MockPaymentApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, record: PaymentRecord) {
        self.records.lock().unwrap().push(record);
    }

    pub fn fail_for(&self, account_number: &str, err: Error) {
        self.failures
            .lock()
            .unwrap()
            .insert(account_number.to_string(), err);
    }

    /// Accounts asked for so far, in request order.
    pub fn requested_accounts(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }

    pub fn hold(&self) -> Gate {
        let gate = Gate::closed();
        *self.gate.lock().unwrap() = Some(gate.clone());
        gate
    }
}

#[async_trait]
impl PaymentApiClient for MockPaymentApi {
    async fn list_by_account(&self, to_account_number: &str) -> Result<Vec<PaymentRecord>> {
        self.requested
            .lock()
            .unwrap()
            .push(to_account_number.to_string());
        pass_gate(&self.gate).await;

        if let Some(err) = self.failures.lock().unwrap().get(to_account_number) {
            return Err(err.clone());
        }
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.to_account_number == to_account_number)
            .cloned()
            .collect())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Subscription
// ─────────────────────────────────────────────────────────────────────────────

pub struct MockFundingApi {
    account: Mutex<Option<FundingAccount>>,
}

impl MockFundingApi {
    pub fn with_account(account: FundingAccount) -> Self {
        Self {
            account: Mutex::new(Some(account)),
        }
    }

    pub fn set_account(&self, account: Option<FundingAccount>) {
        *self.account.lock().unwrap() = account;
    }
}

#[async_trait]
impl FundingAccountApiClient for MockFundingApi {
    async fn get_shared_account(&self) -> Result<Option<FundingAccount>> {
        Ok(self.account.lock().unwrap().clone())
    }
}

pub struct MockPinApi {
    pin: String,
    verifications: AtomicUsize,
}

impl MockPinApi {
    pub fn accepting(pin: &str) -> Self {
        Self {
            pin: pin.to_string(),
            verifications: AtomicUsize::new(0),
        }
    }

    pub fn verify_count(&self) -> usize {
        self.verifications.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PinApiClient for MockPinApi {
    async fn verify_pin(&self, pin_number: &str) -> Result<bool> {
        self.verifications.fetch_add(1, Ordering::SeqCst);
        Ok(pin_number == self.pin)
    }
}

/// Subscribes products inside the paired [`MockGoalApi`], so reloads see them.
pub struct MockSubscriptionApi {
    goals: Arc<MockGoalApi>,
    next_error: Mutex<Option<Error>>,
    last_request: Mutex<Option<SubscriptionRequest>>,
    calls: AtomicUsize,
}

impl MockSubscriptionApi {
    pub fn new(goals: Arc<MockGoalApi>) -> Self {
        Self {
            goals,
            next_error: Mutex::new(None),
            last_request: Mutex::new(None),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn fail_next(&self, err: Error) {
        *self.next_error.lock().unwrap() = Some(err);
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<SubscriptionRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl SubscriptionApiClient for MockSubscriptionApi {
    async fn subscribe(&self, request: SubscriptionRequest) -> Result<SubscriptionReceipt> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) as i64 + 1;
        *self.last_request.lock().unwrap() = Some(request.clone());
        if let Some(err) = self.next_error.lock().unwrap().take() {
            return Err(err);
        }

        let account_number = format!("333-01-{:06}", request.product_id);
        self.goals.subscribe_anywhere(request.product_id, &account_number);
        Ok(SubscriptionReceipt {
            subscription_id: 900 + call,
            account_number,
            status: "ACTIVE".to_string(),
            start_date: None,
            maturity_date: None,
        })
    }
}
