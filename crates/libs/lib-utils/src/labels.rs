//! # Display Labels
//!
//! Maps the backend's enum-like codes (category ids, listing status, item
//! condition, trade method) to the Chinese labels shown in the UI.

/// Category id -> display name
pub fn category_name(category_id: &str) -> &'static str {
    match category_id {
        "digital" => "数码产品",
        "clothing" => "服饰鞋包",
        "books" => "图书文具",
        "sports" => "运动户外",
        "beauty" => "美妆个护",
        "furniture" => "家居日用",
        "electronics" => "电子电器",
        "others" => "其他",
        _ => "未知分类",
    }
}

/// Listing status -> display text
pub fn status_text(status: &str) -> &'static str {
    match status {
        "active" => "进行中",
        "completed" => "已完成",
        "cancelled" => "已取消",
        "pending" => "待审核",
        _ => "未知状态",
    }
}

/// Listing status -> CSS class; empty for unknown statuses.
pub fn status_class(status: &str) -> &'static str {
    match status {
        "active" => "status-active",
        "completed" => "status-completed",
        "cancelled" => "status-cancelled",
        "pending" => "status-pending",
        _ => "",
    }
}

/// Reputation score -> tier name
pub fn reputation_level(score: i64) -> &'static str {
    match score {
        s if s >= 500 => "钻石用户",
        s if s >= 300 => "铂金用户",
        s if s >= 200 => "黄金用户",
        s if s >= 100 => "白银用户",
        _ => "普通用户",
    }
}

/// Item condition -> display text
pub fn condition_text(condition: &str) -> &'static str {
    match condition {
        "new" => "全新",
        "like-new" => "九成新",
        "good" => "良好",
        "fair" => "一般",
        _ => "未知状态",
    }
}

/// Trade method -> display text
pub fn trade_method_text(method: &str) -> &'static str {
    match method {
        "meetup" => "面交",
        "delivery" => "快递",
        "both" => "两者均可",
        _ => "未知方式",
    }
}
