use plan1q_core::goals::{Goal, GoalView, PaymentGap, PaymentInfo, SubscriptionProgress};
use plan1q_core::profile::InvestmentProfile;
use plan1q_core::recommendation::RecommendationSnapshot;
use plan1q_core::Notice;

/// Formats KRW with thousands separators, e.g. `1,000,000원`.
pub fn won(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    let sign = if amount < 0 { "-" } else { "" };
    format!("{}{}원", sign, grouped)
}

pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_notice(notice: &Notice) {
    eprintln!("[{}] {}", notice.kind, notice.message);
}

pub fn print_profile(profile: &InvestmentProfile) {
    println!(
        "투자 성향: {} (위험등급 {}, 점수 {})",
        profile.risk_type, profile.risk_level, profile.score
    );
    println!("유효기간: {}", profile.expired_at.format("%Y-%m-%d"));
}

pub fn print_snapshot(snapshot: &RecommendationSnapshot) {
    println!("월 납입액: {}", won(snapshot.monthly_amount));
    println!(
        "예상 수익률 {}% / 달성 확률 {}% / 위험도 {} ({})",
        snapshot.total_expected_return,
        snapshot.achievement_probability,
        snapshot.total_risk_score,
        snapshot.risk_assessment
    );
    for product in &snapshot.recommended_products {
        println!(
            "  - [{}] {} {}% · 월 {} · 예상 {}%",
            product.product_type.label(),
            product
                .product_name
                .clone()
                .unwrap_or_else(|| format!("#{}", product.product_id)),
            product.investment_ratio,
            won(product.monthly_amount),
            product.expected_return_rate
        );
    }
    if !snapshot.ai_explanation.is_empty() {
        println!("\n{}", snapshot.ai_explanation);
    }
}

pub fn print_goal_list(goals: &[Goal]) {
    if goals.is_empty() {
        println!("등록된 목표가 없습니다.");
        return;
    }
    for goal in goals {
        println!(
            "#{} {} · 목표 {} · {}개월 · 월 {}",
            goal.goal_id,
            goal.goal_name,
            won(goal.target_amount),
            goal.target_period,
            won(goal.monthly_amount)
        );
    }
}

pub fn print_goal_view(view: &GoalView) {
    let progress = match view.subscription_progress() {
        SubscriptionProgress::NotStarted => "가입 전".to_string(),
        SubscriptionProgress::Partial { subscribed, total } => {
            format!("{}/{} 가입", subscribed, total)
        }
        SubscriptionProgress::Complete => "전체 가입".to_string(),
    };
    println!("#{} {} ({})", view.goal_id, view.goal_name, progress);
    println!(
        "목표 {} · {}개월 · 월 {}",
        won(view.target_amount),
        view.target_period,
        won(view.monthly_amount)
    );
    println!(
        "누적 납입 {} · 수익 {}",
        won(view.total_deposit()),
        won(view.total_profit())
    );

    for item in &view.products {
        let product = &item.product;
        let rate = product
            .display_rate()
            .map(|r| format!(" · {}%", r))
            .unwrap_or_default();
        println!(
            "\n  [{}] {} (#{}) · 월 {}{}",
            product.product_type.label(),
            product.display_name(),
            product.product_id,
            won(product.monthly_amount),
            rate
        );
        if !product.subscribed {
            println!("    미가입");
            continue;
        }
        match &item.payment {
            PaymentInfo::Tracked {
                record,
                status,
                progress,
            } => println!(
                "    {} · 다음 납입 {} · {}/{}회 납입 ({})",
                status.label,
                record.next_payment_date,
                progress.paid_installments,
                progress.total_installments,
                won(progress.paid_amount)
            ),
            PaymentInfo::Unavailable(gap) => println!("    납입 정보 없음 ({})", describe_gap(gap)),
        }
    }
}

fn describe_gap(gap: &PaymentGap) -> String {
    match gap {
        PaymentGap::NoSettlementAccount => "계좌 미연결".to_string(),
        PaymentGap::NoMatchingRecord => "자동이체 없음".to_string(),
        PaymentGap::AmbiguousRecords(n) => format!("자동이체 {}건 중복", n),
        PaymentGap::FetchFailed(_) => "조회 실패".to_string(),
    }
}
