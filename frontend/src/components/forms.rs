//! 表单状态管理模块
//!
//! 将零散的 signal 整合为表单结构体，负责：
//! - 数据的持有
//! - 提交前的本地校验（只检查必填项，格式交给后端）
//! - 数据到请求参数的转换

use leptos::prelude::*;

pub const FILL_ALL_FIELDS: &str = "Please fill in all fields";

/// 登录表单
///
/// 使用 `RwSignal` 因为它实现了 `Copy` trait，可直接在闭包间传递。
#[derive(Clone, Copy)]
pub struct LoginForm {
    pub email: RwSignal<String>,
    pub password: RwSignal<String>,
}

/// 校验通过的登录参数
#[derive(Debug, Clone, PartialEq)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn new() -> Self {
        Self {
            email: RwSignal::new(String::new()),
            password: RwSignal::new(String::new()),
        }
    }

    pub fn validate(&self) -> Result<LoginInput, &'static str> {
        let email = self.email.get_untracked().trim().to_string();
        let password = self.password.get_untracked();
        if email.is_empty() || password.is_empty() {
            return Err(FILL_ALL_FIELDS);
        }
        Ok(LoginInput { email, password })
    }
}

impl Default for LoginForm {
    fn default() -> Self {
        Self::new()
    }
}

/// 注册表单
#[derive(Clone, Copy)]
pub struct SignupForm {
    pub name: RwSignal<String>,
    pub email: RwSignal<String>,
    pub password: RwSignal<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SignupInput {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl SignupForm {
    pub fn new() -> Self {
        Self {
            name: RwSignal::new(String::new()),
            email: RwSignal::new(String::new()),
            password: RwSignal::new(String::new()),
        }
    }

    pub fn validate(&self) -> Result<SignupInput, &'static str> {
        let name = self.name.get_untracked().trim().to_string();
        let email = self.email.get_untracked().trim().to_string();
        let password = self.password.get_untracked();
        if name.is_empty() || email.is_empty() || password.is_empty() {
            return Err(FILL_ALL_FIELDS);
        }
        Ok(SignupInput {
            name,
            email,
            password,
        })
    }

    /// 重置表单到初始状态
    pub fn reset(&self) {
        self.name.set(String::new());
        self.email.set(String::new());
        self.password.set(String::new());
    }
}

impl Default for SignupForm {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_requires_both_fields() {
        let owner = Owner::new();
        owner.set();

        let form = LoginForm::new();
        assert_eq!(form.validate(), Err(FILL_ALL_FIELDS));

        form.email.set("  user@test.com ".to_string());
        assert_eq!(form.validate(), Err(FILL_ALL_FIELDS));

        form.password.set("wrongpass".to_string());
        assert_eq!(
            form.validate(),
            Ok(LoginInput {
                email: "user@test.com".to_string(),
                password: "wrongpass".to_string(),
            })
        );
    }

    #[test]
    fn email_format_is_left_to_the_backend() {
        let owner = Owner::new();
        owner.set();

        let form = SignupForm::new();
        form.name.set("Ada".to_string());
        form.email.set("ada@localhost".to_string());
        form.password.set("secret".to_string());
        assert_eq!(
            form.validate(),
            Ok(SignupInput {
                name: "Ada".to_string(),
                email: "ada@localhost".to_string(),
                password: "secret".to_string(),
            })
        );

        form.reset();
        assert_eq!(form.validate(), Err(FILL_ALL_FIELDS));
    }
}
