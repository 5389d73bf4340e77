mod health_check;
mod subscribe;
mod turnstile_site_key;
