//! # 示例应用程序
//!
//! 演示如何使用 Lorn Inject 按名称组装一个小型服务图

use anyhow::Context;
use clap::Parser;
use inject_common::{
    downcast, inject_fn, instance, Args as CtorArgs, Callable, Constructible, Dependencies,
    InjectError, InjectResult, Injectable, Instance, Locals, ServiceType, TypeInfo,
};
use inject_composition::{ContainerBuilder, LoggingConfig, RegistrationModule};
use inject_registry::{InjectExt, Registry};
use once_cell::sync::OnceCell;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

/// 命令行参数
#[derive(Parser, Debug)]
#[command(name = "example-app")]
#[command(about = "Lorn Inject 示例应用")]
struct Args {
    /// 设置文件路径
    #[arg(short, long, default_value = "config/inject.toml")]
    config: PathBuf,

    /// 日志级别
    #[arg(long, default_value = "info")]
    log_level: String,

    /// 以 JSON 格式输出日志
    #[arg(long)]
    json: bool,

    /// 报表所属的用户
    #[arg(long, default_value = "guest")]
    user: String,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let logging = LoggingConfig {
        level: tracing::Level::from_str(&args.log_level)
            .with_context(|| format!("无效的日志级别: {}", args.log_level))?,
        json_format: args.json,
        ..LoggingConfig::default()
    };

    let registry = ContainerBuilder::new()
        .with_settings_file(&args.config)
        .with_logging(logging)
        .add_module(ReportModule)
        .build()
        .context("构建容器失败")?;

    info!("已注册: {:?}", registry.get_names());

    let injector = registry.create_injector()?;
    let service_name = registry.resolve_name("ReportService");
    let service = injector.get_as::<ReportService>(&service_name)?;
    info!("报表服务就绪: {} ({})", service.title(), service_name);

    let mut locals = Locals::new();
    locals.insert("user".to_string(), instance(args.user.clone()));
    let render = inject_fn!([service_name.as_str(), "user"] => |service: Arc<ReportService>, user: Arc<String>| {
        service.render(&user)
    });
    let report = injector.invoke_as::<String>(&render, None, Some(&locals))?;
    println!("{report}");

    if let Err(e) = injector.get("missingService") {
        warn!("预期中的解析失败: {}", e);
    }

    Ok(())
}

/// 报表配置
#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// 报表标题
    pub title: String,
    /// 每页条数
    pub page_size: usize,
}

/// 数据仓库
#[derive(Debug)]
pub struct Repository {
    config: Arc<ReportConfig>,
}

impl Repository {
    fn rows(&self) -> Vec<String> {
        (1..=self.config.page_size)
            .map(|index| format!("row-{index}"))
            .collect()
    }
}

impl Injectable for Repository {}

impl Constructible for Repository {
    fn dependencies() -> Dependencies {
        Dependencies::signature("fn new(reportConfig: Arc<ReportConfig>)")
    }

    fn construct(args: &mut CtorArgs) -> InjectResult<Self> {
        Ok(Self {
            config: args.next()?,
        })
    }
}

/// 审计日志
#[derive(Debug)]
pub struct AuditLog;

impl AuditLog {
    fn record(&self, event: &str) {
        info!("审计: {}", event);
    }
}

impl Injectable for AuditLog {}

/// 报表服务
#[derive(Debug)]
pub struct ReportService {
    repository: Arc<Repository>,
    config: Arc<ReportConfig>,
    audit: OnceCell<Arc<AuditLog>>,
    warmed: AtomicBool,
}

impl ReportService {
    fn title(&self) -> &str {
        &self.config.title
    }

    fn render(&self, user: &str) -> String {
        if let Some(audit) = self.audit.get() {
            audit.record(&format!("{user} 生成报表"));
        }
        let rows = self.repository.rows().join(", ");
        format!(
            "[{}] user={} warmed={} rows=[{}]",
            self.config.title,
            user,
            self.warmed.load(Ordering::Acquire),
            rows
        )
    }
}

impl Injectable for ReportService {
    fn inject_property(&self, key: &str, value: Instance) -> InjectResult<()> {
        match key {
            "audit" => {
                let _ = self.audit.set(downcast(key, value)?);
                Ok(())
            }
            _ => Err(InjectError::unknown_property("ReportService", key)),
        }
    }

    fn post_construct(&self, method: &str) -> InjectResult<()> {
        match method {
            "warm_up" => {
                self.warmed.store(true, Ordering::Release);
                info!("报表服务预热完成");
                Ok(())
            }
            _ => Err(InjectError::unknown_method("ReportService", method)),
        }
    }
}

impl Constructible for ReportService {
    fn dependencies() -> Dependencies {
        Dependencies::explicit(["repository", "reportConfig"])
    }

    fn construct(args: &mut CtorArgs) -> InjectResult<Self> {
        Ok(Self {
            repository: args.next()?,
            config: args.next()?,
            audit: OnceCell::new(),
            warmed: AtomicBool::new(false),
        })
    }
}

/// 示例服务图的注册模块
struct ReportModule;

impl RegistrationModule for ReportModule {
    fn name(&self) -> &str {
        "report"
    }

    fn register(&self, registry: &Registry) -> InjectResult<()> {
        registry.register_factory(
            "reportConfig",
            Callable::returning(ReportConfig {
                title: "每日报表".to_string(),
                page_size: 3,
            })
            .named("reportConfig"),
        );
        registry.register_value("audit", instance(AuditLog));
        registry.register_service_by_type(ServiceType::of::<Repository>());

        let name = registry.register_service_by_type(ServiceType::of::<ReportService>());
        registry.register_property("audit", TypeInfo::of::<ReportService>(), "audit");
        registry.register_post_construct(TypeInfo::of::<ReportService>(), "warm_up");
        info!("已注册报表服务: {}", name);
        Ok(())
    }
}
