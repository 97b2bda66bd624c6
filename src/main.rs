//! Rep Coach - interactive role-play training for pharmaceutical sales reps.
//!
//! Reads trainee turns from stdin and prints the tagged messages each turn
//! produces. With `--demo`, replays a scripted training run instead. Without
//! an `OPENAI_API_KEY`, falls back to a scripted mock engine so the flow can
//! be exercised offline.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use rep_coach::adapters::ai::{MockEngine, OpenAiEngine};
use rep_coach::config::EngineConfig;
use rep_coach::domain::coaching::{ConversationCoordinator, OutboundMessage, Session};
use rep_coach::ports::CompletionEngine;

const DEMO_TURNS: &[&str] = &[
    "你好",
    "药品: Semaglutide；科室: Endocrinology；难度: Basic。点击【Start】",
    "李主任您好，我们司美格鲁肽在 STEP 系列临床试验中显示平均减重约 15%。",
    "关于副作用，常见为轻中度胃肠道反应，多数患者随治疗时间缓解。",
    "价格方面我们有患者援助项目，可以显著降低患者负担。",
    "结束训练",
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("rep_coach=info")),
        )
        .init();

    let engine = build_engine()?;
    let coordinator = ConversationCoordinator::new(engine);
    let mut session = Session::new();

    if std::env::args().any(|arg| arg == "--demo") {
        run_demo(&coordinator, &mut session).await;
        return Ok(());
    }

    println!("Rep Coach - 医药代表角色扮演训练（输入 exit 退出）");
    println!("示例：药品: Semaglutide；科室: Endocrinology；难度: Basic。点击【Start】");

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            break;
        }

        for message in coordinator.handle_message(&mut session, line).await {
            print_message(&message);
        }
    }

    Ok(())
}

fn build_engine() -> Result<Arc<dyn CompletionEngine>, Box<dyn std::error::Error>> {
    let config = EngineConfig::load()?;

    if config.is_configured() {
        config.validate()?;
        let engine = OpenAiEngine::new(&config)?;
        tracing::info!(model = %config.model_id, "using OpenAI-compatible engine");
        Ok(Arc::new(engine))
    } else {
        tracing::warn!("OPENAI_API_KEY not set, falling back to the mock engine");
        Ok(Arc::new(scripted_mock()))
    }
}

/// Mock replies approximating one full training run, for offline use.
fn scripted_mock() -> MockEngine {
    MockEngine::new()
        .with_reply("评分：82/100 🟢 亮点：引用了 STEP 临床试验数据。改进：可补充具体研究编号。")
        .with_reply("数据听起来不错。不过我的患者里不少人担心胃肠道副作用，你们怎么看？")
        .with_reply("评分：85/100 🟢 亮点：正面回应了安全性顾虑。改进：给出发生率区间更有说服力。")
        .with_reply("明白了。那价格呢？这个药对很多患者来说费用不低。")
        .with_reply("评分：80/100 🟢 亮点：提供了可行的费用解决方案。改进：避免过度承诺报销范围。")
        .with_reply("好的，患者援助项目的细则请发我一份。")
        .with_reply("评分：88/100 🟢 本次训练总体表现良好。")
        .with_reply(
            "总体评分：84/100。主要优势：循证沟通、异议处理得体。关键改进：量化安全性数据。\
             雷达图：学术性 85，沟通技巧 82，异议处理 86，合规性 90。",
        )
}

async fn run_demo(coordinator: &ConversationCoordinator, session: &mut Session) {
    for turn in DEMO_TURNS {
        println!("> {turn}");
        for message in coordinator.handle_message(session, turn).await {
            print_message(&message);
        }
        println!();
    }
}

fn print_message(message: &OutboundMessage) {
    println!("{} ▶ {}", message.speaker, message.body);
}
