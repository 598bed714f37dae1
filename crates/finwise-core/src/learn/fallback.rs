//! Built-in fallback datasets for the learning page
//!
//! Served whenever the generation backend fails, rate-limits out, or
//! returns content of the wrong shape.

use chrono::Utc;

use super::{BlogPost, QuizQuestion, Quote};

fn question(
    question: &str,
    options: [&str; 4],
    correct_answer: usize,
    explanation: &str,
) -> QuizQuestion {
    QuizQuestion {
        question: question.to_string(),
        options: options.iter().map(|o| o.to_string()).collect(),
        correct_answer,
        explanation: explanation.to_string(),
    }
}

/// The fixed 10-question fallback quiz
pub fn quiz() -> Vec<QuizQuestion> {
    vec![
        question(
            "What is the 50/30/20 budgeting rule?",
            [
                "50% savings, 30% needs, 20% wants",
                "50% needs, 30% wants, 20% savings",
                "50% wants, 30% savings, 20% needs",
                "50% needs, 30% savings, 20% wants",
            ],
            1,
            "The 50/30/20 rule suggests spending 50% on needs, 30% on wants, and 20% on savings and debt repayment.",
        ),
        question(
            "What is dollar-cost averaging?",
            [
                "Buying stocks at their lowest price",
                "Investing a fixed amount regularly regardless of price",
                "Selling stocks at their highest price",
                "Converting foreign currency to dollars",
            ],
            1,
            "Dollar-cost averaging is investing a fixed amount at regular intervals, regardless of market conditions.",
        ),
        question(
            "Which account typically offers the highest interest rate?",
            [
                "Checking account",
                "Basic savings account",
                "High-yield savings account",
                "Money market account",
            ],
            2,
            "High-yield savings accounts typically offer higher interest rates than traditional savings or checking accounts.",
        ),
        question(
            "What is the primary purpose of an emergency fund?",
            [
                "To invest in stocks",
                "To cover unexpected expenses",
                "To save for retirement",
                "To pay regular bills",
            ],
            1,
            "An emergency fund is primarily used to cover unexpected expenses or income loss.",
        ),
        question(
            "What is a credit utilization ratio?",
            [
                "Your total debt divided by your income",
                "Your credit card balance divided by your credit limit",
                "Your monthly payments divided by your total debt",
                "Your credit score divided by 850",
            ],
            1,
            "Credit utilization is the amount of credit you're using divided by your total credit limit.",
        ),
        question(
            "Which investment typically has the lowest risk?",
            [
                "Cryptocurrency",
                "Individual stocks",
                "Government bonds",
                "Real estate",
            ],
            2,
            "Government bonds, especially from stable countries, are considered one of the lowest-risk investments.",
        ),
        question(
            "What is the main advantage of a Roth IRA?",
            [
                "Immediate tax deduction",
                "Tax-free withdrawals in retirement",
                "Employer matching contributions",
                "No contribution limits",
            ],
            1,
            "Roth IRA contributions grow tax-free and can be withdrawn tax-free in retirement.",
        ),
        question(
            "What is a good credit score range?",
            ["300-500", "500-600", "600-700", "700-850"],
            3,
            "A credit score between 700-850 is considered good to excellent.",
        ),
        question(
            "What is the Rule of 72?",
            [
                "A tax regulation",
                "A formula to estimate investment doubling time",
                "A retirement planning rule",
                "A credit score calculation",
            ],
            1,
            "The Rule of 72 helps estimate how long it will take for an investment to double at a given interest rate.",
        ),
        question(
            "What is the first step in creating a budget?",
            [
                "Cut all expenses",
                "Track current spending",
                "Set savings goals",
                "Open a new bank account",
            ],
            1,
            "Tracking your current spending is essential to understand your financial habits before creating a budget.",
        ),
    ]
}

/// The fixed 3-quote fallback set
pub fn quotes() -> Vec<Quote> {
    vec![
        Quote {
            text: "The best investment you can make is in yourself.".to_string(),
            author: "Warren Buffett".to_string(),
        },
        Quote {
            text: "Don't work for money; make money work for you.".to_string(),
            author: "Robert Kiyosaki".to_string(),
        },
        Quote {
            text: "Financial freedom is available to those who learn about it and work for it."
                .to_string(),
            author: "Robert Kiyosaki".to_string(),
        },
    ]
}

/// The fixed 3-post fallback set, dated today
pub fn blogs() -> Vec<BlogPost> {
    let today = Utc::now().format("%b %-d, %Y").to_string();
    vec![
        BlogPost {
            title: "The Future of Digital Banking: What to Expect".to_string(),
            url: "https://www.forbes.com/money".to_string(),
            source: "Forbes".to_string(),
            date: today.clone(),
        },
        BlogPost {
            title: "Sustainable Investing: A Guide for Beginners".to_string(),
            url: "https://www.bloomberg.com/markets".to_string(),
            source: "Bloomberg".to_string(),
            date: today.clone(),
        },
        BlogPost {
            title: "AI in Personal Finance: How Machine Learning is Changing Money Management"
                .to_string(),
            url: "https://www.reuters.com/markets".to_string(),
            source: "Reuters".to_string(),
            date: today,
        },
    ]
}
