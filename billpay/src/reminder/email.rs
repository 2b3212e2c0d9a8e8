use crate::{bill::Bill, mail::Email, notification::generate::DATE_FORMAT, user::User};

fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Reminder about `bill`, due in `days_until_due` days, addressed to its owner
pub fn reminder(bill: &Bill, user: &User, days_until_due: i64) -> Email {
    let greeting = user.display_name();
    let amount = bill.display_amount();
    let due_date = bill.due_date.format(DATE_FORMAT).to_string();
    let category = bill.category.label();

    let text = format!(
        "Hello {greeting},

This is a friendly reminder that your bill is due soon:

Bill: {name}
Amount: {amount}
Due Date: {due_date}
Category: {category}

Don't forget to pay on time to avoid late fees!

---
Bill Payment Reminder",
        name = bill.name,
    );

    let html = format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <style>
        body {{ font-family: sans-serif; line-height: 1.6; color: #333; }}
        .container {{ max-width: 600px; margin: 0 auto; padding: 20px; }}
        .header {{ background: #2563eb; color: white; padding: 20px; border-radius: 8px 8px 0 0; }}
        .content {{ background: #f8fafc; padding: 20px; border-radius: 0 0 8px 8px; }}
        .bill-details {{ background: white; padding: 15px; border-radius: 8px; margin: 15px 0; }}
        .amount {{ font-size: 24px; font-weight: bold; color: #2563eb; }}
        .due-date {{ color: #f59e0b; font-weight: bold; }}
    </style>
</head>
<body>
    <div class="container">
        <div class="header">
            <h2>Bill Payment Reminder</h2>
        </div>
        <div class="content">
            <p>Hello {greeting},</p>
            <p>This is a friendly reminder that your bill is due soon:</p>
            <div class="bill-details">
                <h3>{name}</h3>
                <p class="amount">Amount: {amount}</p>
                <p class="due-date">Due: {due_date} ({days_until_due} day(s) left)</p>
                <p>Category: {category}</p>
            </div>
            <p>Don't forget to pay on time to avoid late fees!</p>
            <p style="color: #64748b; font-size: 12px; margin-top: 30px;">Bill Payment Reminder Team</p>
        </div>
    </div>
</body>
</html>
"#,
        greeting = escape(greeting),
        name = escape(&bill.name),
    );

    Email {
        to: user.email.clone(),
        subject: format!(
            "Bill Reminder: {} due in {} day(s)",
            bill.name, days_until_due
        ),
        text,
        html,
    }
}
